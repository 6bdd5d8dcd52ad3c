//! Settings schema for Quill.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root settings record, persisted as a single document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuillSettings {
    /// API credential for the completion endpoint.
    #[serde(default)]
    pub api_key: String,
    /// Vault-relative folder that stores conversation transcripts.
    #[serde(default = "default_conversation_folder")]
    pub conversation_folder: String,
    /// Path of the active conversation; validated against storage before use.
    #[serde(default)]
    pub current_conversation_path: Option<String>,
    /// Track every open document as context instead of only the active one.
    #[serde(default)]
    pub include_all_open_files: bool,
    #[serde(default)]
    pub shortcuts: Shortcuts,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for QuillSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            conversation_folder: default_conversation_folder(),
            current_conversation_path: None,
            include_all_open_files: false,
            shortcuts: Shortcuts::default(),
            api: ApiConfig::default(),
        }
    }
}

impl QuillSettings {
    /// Start building settings programmatically with defaults applied.
    pub fn builder() -> QuillSettingsBuilder {
        QuillSettingsBuilder::new()
    }
}

/// Builder for assembling `QuillSettings` in code.
#[derive(Debug, Default, Clone)]
pub struct QuillSettingsBuilder {
    settings: QuillSettings,
}

impl QuillSettingsBuilder {
    /// Create a new builder seeded with default values.
    pub fn new() -> Self {
        Self {
            settings: QuillSettings::default(),
        }
    }

    /// Set the API credential.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.settings.api_key = api_key.into();
        self
    }

    /// Set the conversation folder.
    pub fn conversation_folder(mut self, folder: impl Into<String>) -> Self {
        self.settings.conversation_folder = folder.into();
        self
    }

    /// Set the current conversation pointer.
    pub fn current_conversation_path(mut self, path: impl Into<String>) -> Self {
        self.settings.current_conversation_path = Some(path.into());
        self
    }

    /// Toggle tracking of all open documents.
    pub fn include_all_open_files(mut self, include: bool) -> Self {
        self.settings.include_all_open_files = include;
        self
    }

    /// Replace the keybinding table.
    pub fn shortcuts(mut self, shortcuts: Shortcuts) -> Self {
        self.settings.shortcuts = shortcuts;
        self
    }

    /// Replace the completion endpoint parameters.
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.settings.api = api;
        self
    }

    /// Finalize and return the built settings.
    pub fn build(self) -> QuillSettings {
        self.settings
    }
}

fn default_conversation_folder() -> String {
    "convos".to_string()
}

/// Parameters for the remote completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            anthropic_version: default_anthropic_version(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.5
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

/// Modifier key in a hotkey descriptor.
///
/// `Mod` is the platform primary modifier (Ctrl in terminals).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Mod,
    Ctrl,
    Meta,
    Shift,
    Alt,
}

impl Modifier {
    /// Canonical descriptor name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Mod => "Mod",
            Modifier::Ctrl => "Ctrl",
            Modifier::Meta => "Meta",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of modifier keys plus one key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Hotkey {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl Hotkey {
    /// Build a hotkey descriptor.
    pub fn new(modifiers: impl Into<Vec<Modifier>>, key: impl Into<String>) -> Self {
        Self {
            modifiers: modifiers.into(),
            key: key.into(),
        }
    }

    /// Compare two descriptors ignoring modifier order and key case.
    pub fn matches(&self, other: &Hotkey) -> bool {
        if !self.key.eq_ignore_ascii_case(&other.key) {
            return false;
        }
        let mut left = self.modifiers.clone();
        let mut right = other.modifiers.clone();
        left.sort();
        left.dedup();
        right.sort();
        right.dedup();
        left == right
    }
}

/// Keybindings for the four chat actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shortcuts {
    #[serde(default = "default_open_interface")]
    pub open_interface: Vec<Hotkey>,
    #[serde(default = "default_open_last_conversation")]
    pub open_last_conversation: Vec<Hotkey>,
    #[serde(default = "default_new_conversation")]
    pub new_conversation: Vec<Hotkey>,
    #[serde(default = "default_hide_interface")]
    pub hide_interface: Vec<Hotkey>,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            open_interface: default_open_interface(),
            open_last_conversation: default_open_last_conversation(),
            new_conversation: default_new_conversation(),
            hide_interface: default_hide_interface(),
        }
    }
}

fn default_open_interface() -> Vec<Hotkey> {
    vec![Hotkey::new([Modifier::Mod], "O")]
}

fn default_open_last_conversation() -> Vec<Hotkey> {
    vec![Hotkey::new([Modifier::Mod], "L")]
}

fn default_new_conversation() -> Vec<Hotkey> {
    vec![Hotkey::new([Modifier::Mod, Modifier::Shift], "N")]
}

fn default_hide_interface() -> Vec<Hotkey> {
    vec![Hotkey::new([Modifier::Mod], "H")]
}
