use clap::Subcommand;
use mqtt_codec::{packet::Disconnect, Packet};

use super::{connect::ConnectCmd, publish::PublishCmd, subscribe::{SubscribeCmd, UnsubscribeCmd}};
use crate::{session::Session, CmdResult};

#[derive(Debug, Subcommand)]
pub enum EncodeCmd {
    /// a PUBLISH packet
    Publish(PublishCmd),

    /// a SUBSCRIBE packet with a single topic filter
    Subscribe(SubscribeCmd),

    /// an UNSUBSCRIBE packet with a single topic filter
    Unsubscribe(UnsubscribeCmd),

    /// a CONNECT packet
    Connect(ConnectCmd),

    /// a PINGREQ packet
    Pingreq,

    /// a DISCONNECT packet
    Disconnect,
}

impl EncodeCmd {

    pub fn execute(&self, session: &Session) -> CmdResult {
        let packet = match self {
            EncodeCmd::Publish(cmd) => cmd.build(session)?,
            EncodeCmd::Subscribe(cmd) => cmd.build(session)?,
            EncodeCmd::Unsubscribe(cmd) => cmd.build(session)?,
            EncodeCmd::Connect(cmd) => cmd.build(session)?,
            EncodeCmd::Pingreq => Packet::Pingreq,
            EncodeCmd::Disconnect => Packet::Disconnect(Disconnect::new()),
        };

        session.print_encoded(packet)
    }
}
