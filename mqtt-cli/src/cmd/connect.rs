use anyhow::Result;
use clap::Parser;
use mqtt_codec::{packet::Connect, Packet};

use crate::session::Session;

#[derive(Debug, Parser)]
pub struct ConnectCmd {
    /// may be empty to have the server assign one
    #[arg(short, long, default_value = "")]
    client_id: String,

    /// in seconds
    #[arg(short, long)]
    keep_alive: Option<u16>,

    #[arg(short, long)]
    username: Option<String>,

    #[arg(short, long)]
    password: Option<String>,
}

impl ConnectCmd {

    pub fn build(&self, session: &Session) -> Result<Packet> {
        let mut connect = Connect::new(self.client_id.clone());
        connect.protocol_version = session.version();
        connect.properties = session.properties();
        connect.username = self.username.clone();
        connect.password = self.password.as_ref().map(|p| p.clone().into_bytes());

        if let Some(keep_alive) = self.keep_alive {
            connect.keep_alive = keep_alive;
        }

        Ok(Packet::Connect(connect))
    }
}
