//! Path helpers.
//!
//! The proxied tool keeps its settings under `~/.claude`. Our own optional
//! configuration follows XDG and respects `XDG_CONFIG_HOME`, falling back
//! to `~/.config`.

use std::path::PathBuf;

use crate::error::{Result, SwitchError};

/// Directory name under the home directory that holds the tool's settings.
pub const SETTINGS_DIR_NAME: &str = ".claude";

/// File name of the settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory name under the XDG config base for our configuration.
pub const APP_DIR_NAME: &str = "proxyswitch";

/// Returns the XDG config base directory.
///
/// Uses `XDG_CONFIG_HOME` if set, otherwise `~/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

/// Returns the settings directory, `~/.claude`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn settings_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(SETTINGS_DIR_NAME))
        .ok_or(SwitchError::HomeDirUnavailable)
}
