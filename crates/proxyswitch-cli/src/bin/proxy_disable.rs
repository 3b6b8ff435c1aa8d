//! Removes the proxy routing from the tool's settings.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use proxyswitch_cli::commands::disable::{self, DisableArgs, USAGE};
use proxyswitch_cli::{display, logging};

fn main() -> ExitCode {
    logging::init_tracing();

    let args = match DisableArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            display::usage(USAGE);
            return ExitCode::FAILURE;
        }
    };

    match disable::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            display::failure("Error updating settings", &format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
