use anyhow::Result;
use clap::Parser;
use mqtt_codec::{packet::{Subscribe, TopicFilter, Unsubscribe}, types::QoS, Packet};

use crate::session::Session;

#[derive(Debug, Parser)]
pub struct SubscribeCmd {
    /// Topic pattern to subscribe to, may include wildcards (`+` or `#`).
    #[arg(short, long)]
    topic: String,

    /// Maximum Quality of Service level, defaults to 0.
    #[arg(short, long)]
    qos: Option<u8>,

    #[arg(long)]
    packet_id: u16,
}

impl SubscribeCmd {

    pub fn build(&self, session: &Session) -> Result<Packet> {
        let qos = match self.qos {
            Some(qos) => QoS::try_from(qos)?,
            None => QoS::AtMostOnce,
        };

        let mut subscribe = Subscribe::new(self.packet_id, vec![TopicFilter::new(self.topic.clone(), qos)]);
        subscribe.properties = session.properties();
        Ok(Packet::Subscribe(subscribe))
    }
}

#[derive(Debug, Parser)]
pub struct UnsubscribeCmd {
    /// Topic pattern to unsubscribe from, exactly as it was subscribed.
    #[arg(short, long)]
    topic: String,

    #[arg(long)]
    packet_id: u16,
}

impl UnsubscribeCmd {

    pub fn build(&self, session: &Session) -> Result<Packet> {
        let mut unsubscribe = Unsubscribe::new(self.packet_id, vec![self.topic.clone()]);
        unsubscribe.properties = session.properties();
        Ok(Packet::Unsubscribe(unsubscribe))
    }
}
