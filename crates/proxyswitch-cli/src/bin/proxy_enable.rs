//! Routes the tool's API calls through the local proxy.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use proxyswitch_cli::commands::enable::{self, EnableArgs, USAGE};
use proxyswitch_cli::{display, logging};

fn main() -> Result<ExitCode> {
    logging::init_tracing();

    let args = match EnableArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            display::usage(USAGE);
            return Ok(ExitCode::FAILURE);
        }
    };

    enable::run(&args)?;

    Ok(ExitCode::SUCCESS)
}
