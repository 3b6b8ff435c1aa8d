//! `proxy-enable`: inject the proxy block into the settings document.

use anyhow::{Context, Result};
use clap::Parser;
use proxyswitch_core::{SettingsStore, SwitchConfig};
use tracing::info;

use crate::display;

/// Usage line printed when the argument count is wrong.
pub const USAGE: &str = "proxy-enable <master_key>";

#[derive(Parser, Debug)]
#[command(name = "proxy-enable", version, about = "Route API calls through the local proxy")]
pub struct EnableArgs {
    /// Master key of the local proxy, used as the auth token
    #[arg(allow_hyphen_values = true)]
    pub master_key: String,
}

/// Writes the proxy block using `args.master_key` as the auth token.
///
/// # Errors
///
/// Returns an error if the settings directory cannot be resolved or created,
/// or the settings file cannot be written.
pub fn run(args: &EnableArgs) -> Result<()> {
    let config = SwitchConfig::load_or_default();
    let store = SettingsStore::new()?;

    store
        .enable(&config.proxy, &args.master_key)
        .with_context(|| format!("Failed to update {}", store.settings_path().display()))?;

    info!(path = %store.settings_path().display(), "Proxy enabled");
    display::success("Updated settings while preserving existing configuration");

    Ok(())
}
