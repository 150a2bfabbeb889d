use anyhow::{bail, Context};
use clap::Parser;
use mqtt_codec::{MqttError, Packet};
use tracing::debug;

use crate::{hexstr, session::Session, CmdResult};

#[derive(Debug, Parser)]
pub struct DecodeCmd {
    /// Packet bytes as hex, e.g. `30 05 00 01 61 68 69`. Several packets may follow each other.
    #[arg(required = true)]
    hex: Vec<String>,
}

impl DecodeCmd {

    pub fn execute(&self, session: &Session) -> CmdResult {
        let bytes = hexstr::parse_hex(&self.hex.join(" "))?;
        if bytes.is_empty() {
            bail!("nothing to decode")
        }

        let mut offset = 0;
        while offset < bytes.len() {
            match Packet::decode_from(&bytes[offset..], session.version()) {
                Ok((packet, consumed)) => {
                    debug!(offset, consumed, "decoded {}", packet.packet_type());
                    println!("{:#?}", packet);
                    offset += consumed;
                },
                Err(MqttError::Incomplete { needed }) => {
                    bail!("packet at offset {} is incomplete, at least {} more bytes needed", offset, needed)
                },
                Err(e) => return Err(e).with_context(|| format!("failed to decode packet at offset {}", offset)),
            }
        }

        Ok(())
    }
}
