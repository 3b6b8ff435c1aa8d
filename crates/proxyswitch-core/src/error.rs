//! Error types for proxy settings and key generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing proxy-related files.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// I/O error (reading or writing settings and env files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The user's home directory could not be determined.
    #[error("Failed to determine home directory")]
    HomeDirUnavailable,

    /// The settings file parsed as JSON but the top level is not an object.
    #[error("Settings file is not a JSON object: {}", .0.display())]
    NotAnObject(PathBuf),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings store error.
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type alias using `SwitchError`.
pub type Result<T> = std::result::Result<T, SwitchError>;
