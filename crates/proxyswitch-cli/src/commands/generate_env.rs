//! `generate-env`: write fresh proxy keys to a `.env` file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use proxyswitch_core::{DEFAULT_ENV_FILE, EnvFile, SwitchConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "generate-env", version, about = "Generate a .env file with random proxy keys")]
pub struct GenerateEnvArgs {
    /// Path of the env file to write (overwritten if present)
    #[arg(long, short, default_value = DEFAULT_ENV_FILE)]
    pub output: PathBuf,
}

/// Generates new keys, writes them to `args.output`, and prints the master key.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn run(args: &GenerateEnvArgs) -> Result<()> {
    let config = SwitchConfig::load_or_default();

    let env = EnvFile::generate(&config.env_file);
    env.write_to(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(path = %args.output.display(), "Generated env file");
    println!("Master Key: {}", env.master_key);

    Ok(())
}
