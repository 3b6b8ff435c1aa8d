//! Proxy and env-file configuration.
//!
//! Configuration is optionally loaded from
//! `$XDG_CONFIG_HOME/proxyswitch/config.toml`. Every field has a default,
//! so a missing file or a missing table is the same as the built-in profile.
//!
//! ## Example Configuration
//!
//! ```toml
//! [proxy]
//! base_url = "http://localhost:4444"
//! model = "claude-sonnet-4"
//! small_fast_model = "gpt-4"
//! restore_model = "opusplan"
//!
//! [env_file]
//! token_prefix = "litellm-"
//! master_key_var = "LITELLM_MASTER_KEY"
//! salt_key_var = "LITELLM_SALT_KEY"
//! network_monitor_var = "ENABLE_NETWORK_MONITOR"
//! enable_network_monitor = true
//! log_level_var = "LOG_LEVEL"
//! log_level = "DEBUG"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SwitchError};
use crate::paths;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Values injected into the settings document by the enabler.
    #[serde(default)]
    pub proxy: ProxyProfile,

    /// Values written by the key generator.
    #[serde(default)]
    pub env_file: EnvFileProfile,
}

/// The endpoint and model literals that make up the proxy block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyProfile {
    /// Local proxy endpoint the tool is redirected to.
    pub base_url: String,

    /// Model selected while the proxy is enabled.
    pub model: String,

    /// Secondary model used for lightweight requests.
    pub small_fast_model: String,

    /// Model restored on disable when `model` still matches the proxy model.
    pub restore_model: String,

    /// Schema URL written once when the settings document lacks one.
    pub schema_url: String,
}

impl Default for ProxyProfile {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4444".to_string(),
            model: "claude-sonnet-4".to_string(),
            small_fast_model: "gpt-4".to_string(),
            restore_model: "opusplan".to_string(),
            schema_url: "https://json.schemastore.org/claude-code-settings.json".to_string(),
        }
    }
}

/// Names and static values for the generated `.env` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvFileProfile {
    /// Literal tag prepended to each generated token.
    pub token_prefix: String,

    /// Variable name for the master key.
    pub master_key_var: String,

    /// Variable name for the salt key.
    pub salt_key_var: String,

    /// Variable name for the network monitor flag.
    pub network_monitor_var: String,

    /// Value of the network monitor flag.
    pub enable_network_monitor: bool,

    /// Variable name for the proxy log level.
    pub log_level_var: String,

    /// Value of the proxy log level.
    pub log_level: String,
}

impl Default for EnvFileProfile {
    fn default() -> Self {
        Self {
            token_prefix: "litellm-".to_string(),
            master_key_var: "LITELLM_MASTER_KEY".to_string(),
            salt_key_var: "LITELLM_SALT_KEY".to_string(),
            network_monitor_var: "ENABLE_NETWORK_MONITOR".to_string(),
            enable_network_monitor: true,
            log_level_var: "LOG_LEVEL".to_string(),
            log_level: "DEBUG".to_string(),
        }
    }
}

impl SwitchConfig {
    /// Loads configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config directory cannot be determined
    /// - The file cannot be read
    /// - Deserialization or validation fails
    pub fn load() -> Result<Option<Self>> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Loads configuration from the default location, falling back to the
    /// built-in profile when the file is missing or invalid.
    #[must_use]
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(Some(config)) => {
                debug!("Loaded configuration");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring configuration: {e}");
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SwitchError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Returns the default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = paths::config_dir()
            .ok_or_else(|| {
                SwitchError::Config("Failed to determine config directory".to_string())
            })?
            .join(paths::APP_DIR_NAME);

        Ok(config_dir.join("config.toml"))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is empty, a variable name is
    /// repeated, or any env file name or value would produce a malformed
    /// `KEY=value` line.
    pub fn validate(&self) -> Result<()> {
        let env = &self.env_file;
        let vars = [
            ("env_file.master_key_var", &env.master_key_var),
            ("env_file.salt_key_var", &env.salt_key_var),
            ("env_file.network_monitor_var", &env.network_monitor_var),
            ("env_file.log_level_var", &env.log_level_var),
        ];

        let required = [
            ("proxy.base_url", &self.proxy.base_url),
            ("proxy.model", &self.proxy.model),
        ];
        for (name, value) in required.iter().chain(&vars) {
            if value.trim().is_empty() {
                return Err(SwitchError::Config(format!("'{name}' must not be empty")));
            }
        }

        // Names and the token prefix sit left of (or inside) a single line.
        let prefix = [("env_file.token_prefix", &env.token_prefix)];
        for (name, value) in vars.iter().chain(&prefix) {
            if value.contains(['=', '\n', '\r']) {
                return Err(SwitchError::Config(format!(
                    "'{name}' must not contain '=' or line breaks: {value:?}"
                )));
            }
        }

        if env.log_level.contains(['\n', '\r']) {
            return Err(SwitchError::Config(format!(
                "'env_file.log_level' must not contain line breaks: {:?}",
                env.log_level
            )));
        }

        for (i, (name, value)) in vars.iter().enumerate() {
            if let Some((other, _)) = vars[i + 1..].iter().find(|(_, v)| v == value) {
                return Err(SwitchError::Config(format!(
                    "'{name}' and '{other}' must differ"
                )));
            }
        }

        Ok(())
    }
}
