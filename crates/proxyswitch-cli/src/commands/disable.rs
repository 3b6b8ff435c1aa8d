//! `proxy-disable`: remove the proxy block from the settings document.

use anyhow::Result;
use clap::Parser;
use proxyswitch_core::{DisableOutcome, SettingsStore, SwitchConfig};
use tracing::info;

use crate::display;

/// Usage line printed when unexpected arguments are given.
pub const USAGE: &str = "proxy-disable";

#[derive(Parser, Debug)]
#[command(name = "proxy-disable", version, about = "Stop routing API calls through the local proxy")]
pub struct DisableArgs {}

/// Removes the proxy block and prints the outcome.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be loaded or
/// written.
pub fn run(_args: &DisableArgs) -> Result<DisableOutcome> {
    let config = SwitchConfig::load_or_default();
    let store = SettingsStore::new()?;

    let outcome = store.disable(&config.proxy)?;
    match outcome {
        DisableOutcome::NoSettingsFile => {
            display::success("No settings file found - using Claude Code defaults");
        }
        DisableOutcome::Updated(changes) => {
            info!(
                env_removed = changes.env_removed,
                model_restored = changes.model_restored,
                "Proxy disabled"
            );
            display::success("Removed proxy configuration while preserving other settings");
        }
    }

    Ok(outcome)
}
