//! JSON5 settings loading with schema checks.
//!
//! Settings documents are parsed into a `serde_json::Value`, checked against
//! the known key layout, then decoded with serde defaults filling any gaps.

mod merge;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, QuillSettings};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path};

/// Default settings directory under the vault root.
pub(crate) const DEFAULT_SETTINGS_DIR: &str = ".quill";
/// Default settings filename.
pub(crate) const DEFAULT_SETTINGS_FILE: &str = "settings.json5";

impl QuillSettings {
    /// Load settings from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading settings from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load settings from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading settings from raw contents (len={})", contents.len());
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = json5::from_str(contents)?;
        settings_from_value(value)
    }

    /// Default settings location for a vault root.
    pub fn default_path(vault_root: impl AsRef<Path>) -> std::path::PathBuf {
        vault_root
            .as_ref()
            .join(DEFAULT_SETTINGS_DIR)
            .join(DEFAULT_SETTINGS_FILE)
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let folder = self.conversation_folder.trim();
        if folder.is_empty() {
            return Err(ConfigError::InvalidField {
                path: "conversation_folder".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let escapes = Path::new(folder).components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ConfigError::InvalidField {
                path: "conversation_folder".to_string(),
                message: "must be a relative path inside the vault".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.api.temperature) {
            return Err(ConfigError::InvalidField {
                path: "api.temperature".to_string(),
                message: "must be between 0 and 1".to_string(),
            });
        }
        if self.api.max_tokens == 0 {
            return Err(ConfigError::InvalidField {
                path: "api.max_tokens".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        for (slot, hotkeys) in [
            ("open_interface", &self.shortcuts.open_interface),
            ("open_last_conversation", &self.shortcuts.open_last_conversation),
            ("new_conversation", &self.shortcuts.new_conversation),
            ("hide_interface", &self.shortcuts.hide_interface),
        ] {
            if hotkeys.iter().any(|hotkey| hotkey.key.trim().is_empty()) {
                return Err(ConfigError::InvalidField {
                    path: format!("shortcuts.{slot}"),
                    message: "hotkey key must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn settings_from_value(value: Value) -> Result<QuillSettings, ConfigError> {
    schema::validate_settings_schema(&value)?;
    let mut merged = serde_json::to_value(QuillSettings::default())?;
    merge::merge_json_values(&mut merged, &value);
    let settings: QuillSettings = serde_json::from_value(merged)?;
    settings.validate()?;
    Ok(settings)
}
