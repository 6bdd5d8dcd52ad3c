//! In-memory settings with write-through persistence.

use crate::{ConfigError, QuillSettings};
use log::{debug, info};
use parking_lot::RwLock;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shared settings holder. Every successful `update` is written to disk.
#[derive(Debug)]
pub struct SettingsStore {
    /// Backing file; `None` keeps settings in memory only.
    path: Option<PathBuf>,
    settings: RwLock<QuillSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let settings = if path.exists() {
            QuillSettings::load_from_path(&path)?
        } else {
            info!(
                "settings file missing, using defaults (path={})",
                path.display()
            );
            QuillSettings::default()
        };
        Ok(Self {
            path: Some(path),
            settings: RwLock::new(settings),
        })
    }

    /// Store that never touches disk.
    pub fn in_memory(settings: QuillSettings) -> Self {
        Self {
            path: None,
            settings: RwLock::new(settings),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Clone of the current settings.
    pub fn snapshot(&self) -> QuillSettings {
        self.settings.read().clone()
    }

    /// Read a value from the current settings without cloning the whole record.
    pub fn read<R>(&self, f: impl FnOnce(&QuillSettings) -> R) -> R {
        f(&self.settings.read())
    }

    /// Apply a mutation, validate it, and persist before committing.
    ///
    /// On any error the in-memory settings are left untouched.
    pub fn update<R>(&self, f: impl FnOnce(&mut QuillSettings) -> R) -> Result<R, ConfigError> {
        let mut guard = self.settings.write();
        let mut next = guard.clone();
        let result = f(&mut next);
        next.validate()?;
        self.persist(&next)?;
        *guard = next;
        Ok(result)
    }

    /// Write the current settings to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let guard = self.settings.read();
        self.persist(&guard)
    }

    fn persist(&self, settings: &QuillSettings) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(settings)?;
        let temp_path = path.with_extension("json5.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(body.as_bytes())?;
            file.write_all(b"\n")?;
        }
        fs::rename(&temp_path, path)?;
        debug!(
            "persisted settings (path={}, bytes={})",
            path.display(),
            body.len()
        );
        Ok(())
    }
}
