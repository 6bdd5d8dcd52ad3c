use async_trait::async_trait;
use parking_lot::Mutex;
use quill_rs_core::{Vault, VaultError};
use quill_rs_protocol::VaultFile;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// In-memory vault with optional per-path read failures.
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, String>>,
    folders: Mutex<BTreeSet<String>>,
    unreadable: Mutex<HashSet<String>>,
    fail_creates: Mutex<bool>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let vault = Self::new();
        for (path, contents) in files {
            vault.insert(path, contents);
        }
        vault
    }

    pub fn insert(&self, path: &str, contents: &str) {
        self.files
            .lock()
            .insert(path.to_string(), contents.to_string());
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.lock().contains(path)
    }

    /// Make reads of `path` fail with an IO error.
    pub fn fail_reads(&self, path: &str) {
        self.unreadable.lock().insert(path.to_string());
    }

    /// Make every `create` and `create_folder` fail.
    pub fn fail_creates(&self) {
        *self.fail_creates.lock() = true;
    }

    fn check_create(&self) -> Result<(), VaultError> {
        if *self.fail_creates.lock() {
            return Err(VaultError::Io(std::io::Error::other("create disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl Vault for MemoryVault {
    async fn list_files(&self) -> Result<Vec<VaultFile>, VaultError> {
        Ok(self.files.lock().keys().map(VaultFile::new).collect())
    }

    async fn exists(&self, path: &str) -> Result<bool, VaultError> {
        Ok(self.files.lock().contains_key(path))
    }

    async fn read(&self, path: &str) -> Result<String, VaultError> {
        if self.unreadable.lock().contains(path) {
            return Err(VaultError::Io(std::io::Error::other("read disabled")));
        }
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_string()))
    }

    async fn create(&self, path: &str, contents: &str) -> Result<(), VaultError> {
        self.check_create()?;
        let mut files = self.files.lock();
        if files.contains_key(path) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        files.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    async fn modify(&self, path: &str, contents: &str) -> Result<(), VaultError> {
        let mut files = self.files.lock();
        match files.get_mut(path) {
            Some(existing) => {
                *existing = contents.to_string();
                Ok(())
            }
            None => Err(VaultError::NotFound(path.to_string())),
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        self.check_create()?;
        self.folders.lock().insert(path.to_string());
        Ok(())
    }
}
