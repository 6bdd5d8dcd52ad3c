//! Settings models, keybinding descriptors, and persisted settings storage.
//!
//! This crate owns the Quill settings schema, its JSON5 loading and
//! validation, and the in-memory store that writes every mutation back to disk.

mod error;
mod hotkey;
mod loader;
mod model;
mod store;

/// Public error type returned by settings loading and persistence APIs.
pub use error::ConfigError;
/// Hotkey text parsing and formatting.
pub use hotkey::{format_hotkey, parse_hotkey};
/// Settings schema models.
pub use model::*;
/// Persist-on-mutation settings store.
pub use store::SettingsStore;
