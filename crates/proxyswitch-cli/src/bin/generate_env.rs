//! Writes a `.env` file with a fresh master key and salt key.

use anyhow::Result;
use clap::Parser;
use proxyswitch_cli::commands::generate_env::{self, GenerateEnvArgs};
use proxyswitch_cli::logging;

fn main() -> Result<()> {
    logging::init_tracing();

    let args = GenerateEnvArgs::parse();
    generate_env::run(&args)
}
