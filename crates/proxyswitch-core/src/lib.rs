//! Core of proxyswitch.
//!
//! Generates the `.env` keys for a local LLM proxy and toggles the proxy
//! block in the tool's JSON settings document.

pub mod config;
pub mod error;
pub mod keygen;
pub mod paths;
pub mod settings;

pub use config::{EnvFileProfile, ProxyProfile, SwitchConfig};
pub use error::{Result, SwitchError};
pub use keygen::{DEFAULT_ENV_FILE, EnvFile, generate_token};
pub use settings::{
    DisableChanges, DisableOutcome, ProxyState, SettingsDocument, SettingsStore,
};
