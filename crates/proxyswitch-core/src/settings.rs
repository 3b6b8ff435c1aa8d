//! Settings document storage and proxy toggling.
//!
//! The settings document is a JSON object kept at `~/.claude/settings.json`.
//! Enabling the proxy injects an `env` block that points the tool at the
//! local proxy; disabling removes it again. All other top-level keys are
//! carried through untouched and in their original order.
//!
//! ## Example (enabled)
//!
//! ```json
//! {
//!   "theme": "dark",
//!   "env": {
//!     "ANTHROPIC_AUTH_TOKEN": "litellm-…",
//!     "ANTHROPIC_BASE_URL": "http://localhost:4444",
//!     "ANTHROPIC_MODEL": "claude-sonnet-4",
//!     "ANTHROPIC_SMALL_FAST_MODEL": "gpt-4"
//!   },
//!   "model": "claude-sonnet-4",
//!   "$schema": "https://json.schemastore.org/claude-code-settings.json"
//! }
//! ```

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::{debug, instrument, warn};

use crate::config::ProxyProfile;
use crate::error::{Result, SwitchError};
use crate::paths;

/// Key holding the proxy block.
pub const ENV_KEY: &str = "env";

/// Key holding the active model.
pub const MODEL_KEY: &str = "model";

/// Key holding the JSON schema URL.
pub const SCHEMA_KEY: &str = "$schema";

/// Environment variable names injected by the proxy block.
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const MODEL_VAR: &str = "ANTHROPIC_MODEL";
pub const SMALL_FAST_MODEL_VAR: &str = "ANTHROPIC_SMALL_FAST_MODEL";

/// Whether a settings document currently routes through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    /// No `env` block is present.
    Disabled,
    /// An `env` block is present.
    Enabled,
}

/// What `remove_proxy` changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisableChanges {
    /// The `env` block existed and was removed.
    pub env_removed: bool,
    /// `model` matched the proxy model and was reset.
    pub model_restored: bool,
}

/// Result of disabling the proxy through a [`SettingsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableOutcome {
    /// There was no settings file; nothing was touched.
    NoSettingsFile,
    /// The settings file was rewritten.
    Updated(DisableChanges),
}

/// An in-memory settings document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    fields: Map<String, Value>,
}

impl SettingsDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from JSON text.
    ///
    /// Returns `Ok(None)` if the JSON is valid but not an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Option<Self>> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(fields) => Ok(Some(Self { fields })),
            _ => Ok(None),
        }
    }

    /// Serializes the document with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the `model` value if it is a string.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.fields.get(MODEL_KEY).and_then(Value::as_str)
    }

    /// Returns the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Reports whether the proxy block is present.
    #[must_use]
    pub fn state(&self) -> ProxyState {
        if self.fields.contains_key(ENV_KEY) {
            ProxyState::Enabled
        } else {
            ProxyState::Disabled
        }
    }

    /// Injects the proxy block, selects the proxy model, and sets the
    /// schema URL if the document has none.
    ///
    /// An existing `env` block is replaced wholesale.
    pub fn apply_proxy(&mut self, profile: &ProxyProfile, auth_token: &str) {
        self.fields.insert(
            ENV_KEY.to_string(),
            json!({
                AUTH_TOKEN_VAR: auth_token,
                BASE_URL_VAR: profile.base_url,
                MODEL_VAR: profile.model,
                SMALL_FAST_MODEL_VAR: profile.small_fast_model,
            }),
        );

        self.fields
            .insert(MODEL_KEY.to_string(), Value::String(profile.model.clone()));

        if !self.fields.contains_key(SCHEMA_KEY) {
            self.fields.insert(
                SCHEMA_KEY.to_string(),
                Value::String(profile.schema_url.clone()),
            );
        }
    }

    /// Removes the proxy block.
    ///
    /// If `model` still equals the proxy model it is reset to the profile's
    /// restore model. This cannot tell a user-chosen value apart from one
    /// set by [`apply_proxy`](Self::apply_proxy).
    pub fn remove_proxy(&mut self, profile: &ProxyProfile) -> DisableChanges {
        // shift_remove keeps the order of the remaining keys
        let env_removed = self.fields.shift_remove(ENV_KEY).is_some();

        let model_restored = self.model() == Some(profile.model.as_str());
        if model_restored {
            self.fields.insert(
                MODEL_KEY.to_string(),
                Value::String(profile.restore_model.clone()),
            );
        }

        DisableChanges {
            env_removed,
            model_restored,
        }
    }
}

/// Reads and writes the settings document on disk.
pub struct SettingsStore {
    /// Settings directory
    dir: PathBuf,

    /// Settings file path
    settings_file: PathBuf,
}

impl SettingsStore {
    /// Creates a store rooted at `~/.claude`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::at(paths::settings_dir()?))
    }

    /// Creates a store rooted at an explicit directory.
    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let settings_file = dir.join(paths::SETTINGS_FILE_NAME);
        Self { dir, settings_file }
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn settings_path(&self) -> &Path {
        &self.settings_file
    }

    /// Returns true if the settings file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.settings_file.exists()
    }

    /// Loads the settings document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The contents are not valid JSON
    /// - The top-level value is not an object
    #[instrument(skip(self), fields(path = %self.settings_file.display()))]
    pub fn load(&self) -> Result<SettingsDocument> {
        let json = fs::read_to_string(&self.settings_file)?;
        let document = SettingsDocument::from_json(&json)?
            .ok_or_else(|| SwitchError::NotAnObject(self.settings_file.clone()))?;

        debug!(keys = document.as_map().len(), "Loaded settings");

        Ok(document)
    }

    /// Returns the path unparseable settings are copied to before enable
    /// replaces them.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.settings_file.with_extension("json.bak")
    }

    /// Loads the settings document ahead of an enable.
    ///
    /// A missing file yields an empty document. A file that cannot be read
    /// or parsed is copied to [`backup_path`](Self::backup_path) and also
    /// yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file holds a JSON value that is not an
    /// object, or if an unparseable file cannot be backed up.
    #[instrument(skip(self), fields(path = %self.settings_file.display()))]
    pub fn load_for_update(&self) -> Result<SettingsDocument> {
        if !self.exists() {
            return Ok(SettingsDocument::new());
        }

        match self.load() {
            Ok(document) => Ok(document),
            Err(e @ SwitchError::NotAnObject(_)) => Err(e),
            Err(e) => {
                let backup = self.backup_path();
                fs::copy(&self.settings_file, &backup).map_err(|copy_err| {
                    SwitchError::Settings(format!(
                        "Settings are unreadable ({e}) and could not be backed up to {}: {copy_err}",
                        backup.display()
                    ))
                })?;

                warn!(
                    backup = %backup.display(),
                    "Replacing unreadable settings: {e}"
                );
                Ok(SettingsDocument::new())
            }
        }
    }

    /// Saves the settings document.
    ///
    /// Uses atomic write (write to temp file, then rename) for safety. The
    /// temp file takes the permissions of the file it replaces, and a
    /// symlinked settings file is updated at its target.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    #[instrument(skip(self, document), fields(path = %self.settings_file.display()))]
    pub fn save(&self, document: &SettingsDocument) -> Result<()> {
        let json = document.to_json_pretty()?;

        // Fails for a missing file; the plain path is the target then.
        let target = fs::canonicalize(&self.settings_file)
            .unwrap_or_else(|_| self.settings_file.clone());
        let permissions = fs::metadata(&target).ok().map(|m| m.permissions());

        let temp_path = target.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        if let Some(permissions) = permissions {
            file.set_permissions(permissions)?;
        }
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &target)?;

        debug!(
            target = %target.display(),
            size_bytes = json.len(),
            "Saved settings"
        );

        Ok(())
    }

    /// Routes the tool through the proxy using `auth_token`.
    ///
    /// Creates the settings directory if needed. A settings file that cannot
    /// be parsed is backed up and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the existing
    /// document is not a JSON object, or the document cannot be written.
    #[instrument(skip(self, profile, auth_token))]
    pub fn enable(&self, profile: &ProxyProfile, auth_token: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SwitchError::Settings(format!(
                "Failed to create settings directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut document = self.load_for_update()?;
        let previous = document.state();

        document.apply_proxy(profile, auth_token);
        self.save(&document)?;

        debug!(?previous, base_url = %profile.base_url, "Enabled proxy");

        Ok(())
    }

    /// Removes the proxy block from the settings file.
    ///
    /// Does nothing if the settings file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or written.
    #[instrument(skip(self, profile))]
    pub fn disable(&self, profile: &ProxyProfile) -> Result<DisableOutcome> {
        if !self.exists() {
            debug!("No settings file, nothing to disable");
            return Ok(DisableOutcome::NoSettingsFile);
        }

        let mut document = self.load()?;
        let changes = document.remove_proxy(profile);
        self.save(&document)?;

        debug!(
            env_removed = changes.env_removed,
            model_restored = changes.model_restored,
            "Disabled proxy"
        );

        Ok(DisableOutcome::Updated(changes))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    fn setup_test_store() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::at(temp_dir.path().join(".claude"));
        (store, temp_dir)
    }

    fn write_settings(store: &SettingsStore, json: &str) {
        fs::create_dir_all(store.settings_path().parent().unwrap()).unwrap();
        fs::write(store.settings_path(), json).unwrap();
    }

    #[test]
    fn test_apply_proxy_on_empty_document() {
        let profile = ProxyProfile::default();
        let mut doc = SettingsDocument::new();
        doc.apply_proxy(&profile, "litellm-abc");

        assert_eq!(doc.state(), ProxyState::Enabled);
        assert_eq!(
            doc.get(ENV_KEY).unwrap(),
            &json!({
                "ANTHROPIC_AUTH_TOKEN": "litellm-abc",
                "ANTHROPIC_BASE_URL": "http://localhost:4444",
                "ANTHROPIC_MODEL": "claude-sonnet-4",
                "ANTHROPIC_SMALL_FAST_MODEL": "gpt-4",
            })
        );
        assert_eq!(doc.model(), Some("claude-sonnet-4"));
        assert_eq!(
            doc.get(SCHEMA_KEY).unwrap(),
            "https://json.schemastore.org/claude-code-settings.json"
        );
    }

    #[test]
    fn test_apply_proxy_keeps_existing_schema() {
        let mut doc = SettingsDocument::from_json(r#"{"$schema": "custom"}"#)
            .unwrap()
            .unwrap();
        doc.apply_proxy(&ProxyProfile::default(), "one");
        doc.apply_proxy(&ProxyProfile::default(), "two");

        assert_eq!(doc.get(SCHEMA_KEY).unwrap(), "custom");
        assert_eq!(doc.get(ENV_KEY).unwrap()[AUTH_TOKEN_VAR], "two");
    }

    #[test]
    fn test_remove_proxy_restores_model() {
        let profile = ProxyProfile::default();
        let mut doc = SettingsDocument::new();
        doc.apply_proxy(&profile, "token");

        let changes = doc.remove_proxy(&profile);
        assert!(changes.env_removed);
        assert!(changes.model_restored);
        assert_eq!(doc.state(), ProxyState::Disabled);
        assert_eq!(doc.model(), Some("opusplan"));
    }

    #[test]
    fn test_remove_proxy_leaves_other_model() {
        let mut doc = SettingsDocument::from_json(r#"{"model": "haiku"}"#)
            .unwrap()
            .unwrap();

        let changes = doc.remove_proxy(&ProxyProfile::default());
        assert_eq!(changes, DisableChanges::default());
        assert_eq!(doc.model(), Some("haiku"));
    }

    #[test]
    fn test_remove_proxy_ignores_non_string_model() {
        let mut doc = SettingsDocument::from_json(r#"{"model": 4}"#)
            .unwrap()
            .unwrap();

        let changes = doc.remove_proxy(&ProxyProfile::default());
        assert!(!changes.model_restored);
        assert_eq!(doc.get(MODEL_KEY).unwrap(), 4);
    }

    #[test]
    fn test_from_json_non_object() {
        assert!(SettingsDocument::from_json("[1, 2]").unwrap().is_none());
        assert!(SettingsDocument::from_json("{not json").is_err());
    }

    #[test]
    fn test_key_order_preserved() {
        let mut doc = SettingsDocument::from_json(r#"{"zeta": 1, "env": {}, "alpha": 2}"#)
            .unwrap()
            .unwrap();
        doc.remove_proxy(&ProxyProfile::default());

        let keys: Vec<&String> = doc.as_map().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn test_enable_creates_directory_and_file() {
        let (store, _temp) = setup_test_store();
        assert!(!store.exists());

        store.enable(&ProxyProfile::default(), "token").unwrap();

        assert!(store.exists());
        let doc = store.load().unwrap();
        assert_eq!(doc.state(), ProxyState::Enabled);
        assert!(!store.settings_path().with_extension("tmp").exists());
    }

    #[test]
    fn test_enable_preserves_unrelated_keys() {
        let (store, _temp) = setup_test_store();
        write_settings(
            &store,
            r#"{"permissions": {"allow": ["Bash(ls:*)"]}, "theme": "dark"}"#,
        );

        store.enable(&ProxyProfile::default(), "first").unwrap();
        store.enable(&ProxyProfile::default(), "second").unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.get("theme").unwrap(), "dark");
        assert_eq!(
            doc.get("permissions").unwrap(),
            &json!({"allow": ["Bash(ls:*)"]})
        );
        assert_eq!(doc.get(ENV_KEY).unwrap()[AUTH_TOKEN_VAR], "second");
    }

    #[test]
    fn test_enable_replaces_corrupt_file() {
        let (store, _temp) = setup_test_store();
        write_settings(&store, "{ this is not json");

        store.enable(&ProxyProfile::default(), "token").unwrap();

        let doc = store.load().unwrap();
        assert_eq!(doc.as_map().len(), 3);
        assert_eq!(doc.state(), ProxyState::Enabled);
        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "{ this is not json"
        );
    }

    #[test]
    fn test_enable_backs_up_nan_literal() {
        let (store, _temp) = setup_test_store();
        let original = r#"{"permissions": {"allow": ["Read"]}, "ratio": NaN}"#;
        write_settings(&store, original);

        store.enable(&ProxyProfile::default(), "token").unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), original);
        assert!(store.load().unwrap().get("permissions").is_none());
    }

    #[test]
    fn test_enable_non_object_fails() {
        let (store, _temp) = setup_test_store();
        write_settings(&store, "[1, 2]");

        assert!(matches!(
            store.enable(&ProxyProfile::default(), "token"),
            Err(SwitchError::NotAnObject(_))
        ));
        assert_eq!(fs::read_to_string(store.settings_path()).unwrap(), "[1, 2]");
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_enable_valid_file_leaves_no_backup() {
        let (store, _temp) = setup_test_store();
        write_settings(&store, r#"{"theme": "dark"}"#);

        store.enable(&ProxyProfile::default(), "token").unwrap();
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_disable_preserves_number_text() {
        let (store, _temp) = setup_test_store();
        write_settings(
            &store,
            r#"{"id": 123456789012345678901234567890, "ratio": 1.10, "env": {}}"#,
        );

        store.disable(&ProxyProfile::default()).unwrap();

        let text = fs::read_to_string(store.settings_path()).unwrap();
        assert_eq!(
            text,
            "{\n  \"id\": 123456789012345678901234567890,\n  \"ratio\": 1.10\n}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = setup_test_store();
        write_settings(&store, "{}");
        fs::set_permissions(store.settings_path(), fs::Permissions::from_mode(0o600)).unwrap();

        store.enable(&ProxyProfile::default(), "token").unwrap();

        let mode = fs::metadata(store.settings_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink() {
        let (store, temp) = setup_test_store();
        let dotfiles = temp.path().join("dotfiles");
        fs::create_dir_all(&dotfiles).unwrap();
        let real = dotfiles.join("settings.json");
        fs::write(&real, r#"{"theme": "dark"}"#).unwrap();
        fs::create_dir_all(store.settings_path().parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&real, store.settings_path()).unwrap();

        store.enable(&ProxyProfile::default(), "token").unwrap();

        let link = fs::symlink_metadata(store.settings_path()).unwrap();
        assert!(link.file_type().is_symlink());

        let doc = SettingsDocument::from_json(&fs::read_to_string(&real).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(doc.get("theme").unwrap(), "dark");
        assert_eq!(doc.state(), ProxyState::Enabled);
    }

    #[test]
    fn test_enable_writes_pretty_json() {
        let (store, _temp) = setup_test_store();
        store.enable(&ProxyProfile::default(), "token").unwrap();

        let text = fs::read_to_string(store.settings_path()).unwrap();
        assert!(text.starts_with("{\n  \"env\": {\n    \"ANTHROPIC_AUTH_TOKEN\""));
    }

    #[test]
    fn test_disable_without_file() {
        let (store, temp) = setup_test_store();

        let outcome = store.disable(&ProxyProfile::default()).unwrap();
        assert_eq!(outcome, DisableOutcome::NoSettingsFile);
        assert!(!store.exists());
        assert!(!temp.path().join(".claude").exists());
    }

    #[test]
    fn test_enable_then_disable() {
        let (store, _temp) = setup_test_store();
        let profile = ProxyProfile::default();

        store.enable(&profile, "token").unwrap();
        let outcome = store.disable(&profile).unwrap();
        assert_eq!(
            outcome,
            DisableOutcome::Updated(DisableChanges {
                env_removed: true,
                model_restored: true,
            })
        );

        let doc = store.load().unwrap();
        assert!(doc.get(ENV_KEY).is_none());
        assert_eq!(doc.model(), Some("opusplan"));
    }

    #[test]
    fn test_disable_twice_is_noop() {
        let (store, _temp) = setup_test_store();
        let profile = ProxyProfile::default();

        store.enable(&profile, "token").unwrap();
        store.disable(&profile).unwrap();
        let first = fs::read_to_string(store.settings_path()).unwrap();

        let outcome = store.disable(&profile).unwrap();
        assert_eq!(outcome, DisableOutcome::Updated(DisableChanges::default()));
        let second = fs::read_to_string(store.settings_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_disable_corrupt_file_fails() {
        let (store, _temp) = setup_test_store();
        write_settings(&store, "{ broken");

        assert!(matches!(
            store.disable(&ProxyProfile::default()),
            Err(SwitchError::Json(_))
        ));
    }

    #[test]
    fn test_disable_non_object_fails() {
        let (store, _temp) = setup_test_store();
        write_settings(&store, "[]");

        assert!(matches!(
            store.disable(&ProxyProfile::default()),
            Err(SwitchError::NotAnObject(_))
        ));
    }
}
