mod cmd;
mod hexstr;
mod session;

use std::process::ExitCode;

use clap::Parser;
use mqtt_codec::ProtocolVersion;
use tracing_subscriber::EnvFilter;

use crate::{cmd::{Command, MqttCli}, session::Session};

pub type CmdResult = anyhow::Result<()>;

fn main() -> ExitCode {
    let cli = MqttCli::parse();
    init_tracing(cli.verbose);

    let version = if cli.v5 { ProtocolVersion::V5 } else { ProtocolVersion::V311 };
    let session = Session::new(version);

    let result = match cli.command {
        Command::Decode(cmd) => cmd.execute(&session),
        Command::Encode(cmd) => cmd.execute(&session),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

/// `-v` wins over `RUST_LOG`, which wins over the `warn` default.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mqtt_codec=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
