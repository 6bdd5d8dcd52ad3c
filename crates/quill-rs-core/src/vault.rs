//! Note storage abstraction and the filesystem-backed vault.

use crate::error::VaultError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use quill_rs_protocol::VaultFile;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

/// Document storage keyed by vault-relative `/`-separated paths.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Enumerate every file in the vault.
    async fn list_files(&self) -> Result<Vec<VaultFile>, VaultError>;

    /// Whether a file exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, VaultError>;

    /// Read a file as text.
    async fn read(&self, path: &str) -> Result<String, VaultError>;

    /// Create a new file; fails with `AlreadyExists` when the path is taken.
    async fn create(&self, path: &str, contents: &str) -> Result<(), VaultError>;

    /// Replace the contents of an existing file.
    async fn modify(&self, path: &str, contents: &str) -> Result<(), VaultError>;

    /// Create a folder and any missing parents.
    async fn create_folder(&self, path: &str) -> Result<(), VaultError>;
}

/// Vault rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open a vault at `root`. The directory must already exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, VaultError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(VaultError::NotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault-relative path to a filesystem path inside the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, VaultError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(VaultError::InvalidPath(path.to_string()));
        }
        let mut resolved = self.root.clone();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(VaultError::InvalidPath(path.to_string())),
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn list_files(&self) -> Result<Vec<VaultFile>, VaultError> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || walk_vault(&root))
            .await
            .map_err(|err| VaultError::Io(std::io::Error::other(err)))??;
        debug!("listed vault files (count={})", files.len());
        Ok(files)
    }

    async fn exists(&self, path: &str) -> Result<bool, VaultError> {
        let resolved = self.resolve(path)?;
        match tokio::fs::metadata(&resolved).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn read(&self, path: &str) -> Result<String, VaultError> {
        let resolved = self.resolve(path)?;
        tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => VaultError::NotFound(path.to_string()),
                _ => VaultError::Io(err),
            })
    }

    async fn create(&self, path: &str, contents: &str) -> Result<(), VaultError> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&resolved)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::AlreadyExists => VaultError::AlreadyExists(path.to_string()),
                _ => VaultError::Io(err),
            })?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        debug!("created vault file (path={path}, bytes={})", contents.len());
        Ok(())
    }

    async fn modify(&self, path: &str, contents: &str) -> Result<(), VaultError> {
        if !self.exists(path).await? {
            return Err(VaultError::NotFound(path.to_string()));
        }
        let resolved = self.resolve(path)?;
        tokio::fs::write(&resolved, contents).await?;
        debug!("modified vault file (path={path}, bytes={})", contents.len());
        Ok(())
    }

    async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        let resolved = self.resolve(path)?;
        tokio::fs::create_dir_all(&resolved).await?;
        Ok(())
    }
}

fn walk_vault(root: &Path) -> Result<Vec<VaultFile>, VaultError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));
    for entry in walker {
        let entry = entry.map_err(|err| VaultError::Io(std::io::Error::other(err)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = relative
            .components()
            .filter_map(|component| component.as_os_str().to_str())
            .collect::<Vec<_>>()
            .join("/");
        let created_at = entry
            .metadata()
            .ok()
            .and_then(|metadata| metadata.created().ok())
            .map(DateTime::<Utc>::from);
        files.push(VaultFile { path, created_at });
    }
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::{FsVault, Vault};
    use crate::error::VaultError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn vault() -> (TempDir, FsVault) {
        let temp = TempDir::new().expect("tmp");
        let vault = FsVault::new(temp.path()).expect("vault");
        (temp, vault)
    }

    #[tokio::test]
    async fn lists_files_sorted_and_skips_hidden() {
        let (temp, vault) = vault();
        fs::create_dir_all(temp.path().join("notes")).expect("dir");
        fs::create_dir_all(temp.path().join(".quill")).expect("dir");
        fs::write(temp.path().join("notes/b.md"), "b").expect("write");
        fs::write(temp.path().join("notes/a.md"), "a").expect("write");
        fs::write(temp.path().join("root.md"), "r").expect("write");
        fs::write(temp.path().join(".quill/settings.json5"), "{}").expect("write");

        let paths: Vec<String> = vault
            .list_files()
            .await
            .expect("list")
            .into_iter()
            .map(|file| file.path)
            .collect();
        assert_eq!(paths, vec!["notes/a.md", "notes/b.md", "root.md"]);
    }

    #[tokio::test]
    async fn create_rejects_existing_and_modify_requires_existing() {
        let (_temp, vault) = vault();
        vault.create("convos/c.md", "one").await.expect("create");
        assert!(vault.exists("convos/c.md").await.expect("exists"));

        let err = vault.create("convos/c.md", "two").await.unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));

        vault.modify("convos/c.md", "three").await.expect("modify");
        assert_eq!(vault.read("convos/c.md").await.expect("read"), "three");

        let err = vault.modify("convos/missing.md", "x").await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejects_paths_escaping_root() {
        let (_temp, vault) = vault();
        let err = vault.read("../secret.md").await.unwrap_err();
        assert!(matches!(err, VaultError::InvalidPath(_)));
        let err = vault.read("").await.unwrap_err();
        assert!(matches!(err, VaultError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn folders_are_not_files() {
        let (_temp, vault) = vault();
        vault.create_folder("convos").await.expect("folder");
        assert!(!vault.exists("convos").await.expect("exists"));
        let err = vault.read("missing.md").await.unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }
}
