//! Random key generation and `.env` file output.
//!
//! Each run produces a fresh master key and salt key, both derived from a
//! v4 UUID, and overwrites the target file with exactly four lines.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::EnvFileProfile;
use crate::error::Result;

/// Default output file name, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Returns `prefix` followed by a fresh hyphenated v4 UUID.
#[must_use]
pub fn generate_token(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4())
}

/// Contents of a generated env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    /// Access key for the local proxy.
    pub master_key: String,

    /// Salt used by the proxy to encrypt stored credentials.
    pub salt_key: String,

    profile: EnvFileProfile,
}

impl EnvFile {
    /// Generates a new master key and salt key.
    #[must_use]
    pub fn generate(profile: &EnvFileProfile) -> Self {
        Self {
            master_key: generate_token(&profile.token_prefix),
            salt_key: generate_token(&profile.token_prefix),
            profile: profile.clone(),
        }
    }

    /// Renders the four `KEY=value` lines, each newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(160);
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}={}", self.profile.master_key_var, self.master_key);
        let _ = writeln!(out, "{}={}", self.profile.salt_key_var, self.salt_key);
        let _ = writeln!(
            out,
            "{}={}",
            self.profile.network_monitor_var, self.profile.enable_network_monitor
        );
        let _ = writeln!(out, "{}={}", self.profile.log_level_var, self.profile.log_level);
        out
    }

    /// Writes the file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let contents = self.render();
        fs::write(path, &contents)?;

        debug!(size_bytes = contents.len(), "Wrote env file");

        Ok(())
    }
}
