pub mod connect;
pub mod decode;
pub mod encode;
pub mod publish;
pub mod subscribe;

use clap::{Parser, Subcommand};

use self::{decode::DecodeCmd, encode::EncodeCmd};

#[derive(Debug, Parser)]
#[command(name = "mqtt-codec", about = "Decodes and encodes MQTT control packets")]
pub struct MqttCli {

    /// command to run
    #[command(subcommand)]
    pub command: Command,

    /// turns on debug logging
    #[arg(global = true, short, long)]
    pub verbose: bool,

    /// use MQTT 5 instead of 3.1.1
    #[arg(global = true, long)]
    pub v5: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// decodes hex encoded packets and prints them
    Decode(DecodeCmd),

    /// builds a packet and prints it hex encoded
    #[command(subcommand)]
    Encode(EncodeCmd),
}
