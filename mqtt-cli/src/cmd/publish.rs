use anyhow::{bail, Result};
use clap::Parser;
use mqtt_codec::{packet::Publish, types::QoS, Packet};

use crate::session::Session;

#[derive(Debug, Parser)]
pub struct PublishCmd {
    /// Topic to publish to
    #[arg(short, long)]
    topic: String,

    /// message payload
    #[arg(short, long)]
    message: String,

    /// Quality of Service level. 0 (at most once), 1 (at least once), 2 (exactly once)
    #[arg(short, long)]
    qos: Option<u8>,

    /// required for QoS 1 and 2
    #[arg(long)]
    packet_id: Option<u16>,

    /// sets the retain flag
    #[arg(short, long)]
    retain: bool,
}

impl PublishCmd {

    pub fn build(&self, session: &Session) -> Result<Packet> {
        let mut publish = Publish::new(self.topic.clone(), self.message.clone().into_bytes());
        publish.retain = self.retain;
        publish.properties = session.properties();

        if let Some(qos) = self.qos {
            publish.qos_level = QoS::try_from(qos)?;
        }

        match (publish.qos_level, self.packet_id) {
            (QoS::AtMostOnce, Some(_)) => bail!("QoS 0 messages have no packet identifier"),
            (QoS::AtMostOnce, None) => (),
            (_, None) => bail!("--packet-id is required for QoS 1 and 2"),
            (_, id) => publish.packet_identifier = id,
        }

        Ok(Packet::Publish(publish))
    }
}
