use anyhow::Context;
use mqtt_codec::{encode_packet, packet::PropertyList, Packet, ProtocolVersion};
use tracing::debug;

use crate::{hexstr, CmdResult};

/// Settings shared by all commands of one invocation.
pub struct Session {
    version: ProtocolVersion,
}

impl Session {

    pub fn new(version: ProtocolVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// An empty property list for MQTT 5, nothing for 3.1.1.
    pub fn properties(&self) -> Option<PropertyList> {
        match self.version {
            ProtocolVersion::V311 => None,
            ProtocolVersion::V5 => Some(PropertyList::new()),
        }
    }

    /// Encodes the packet and prints it as a single line of hex.
    pub fn print_encoded(&self, packet: Packet) -> CmdResult {
        let packet_type = packet.packet_type();
        let bytes = encode_packet(&packet).with_context(|| format!("failed to encode {}", packet_type))?;
        debug!(%packet_type, len = bytes.len(), "encoded");

        println!("{}", hexstr::to_hex(&bytes));
        Ok(())
    }
}
