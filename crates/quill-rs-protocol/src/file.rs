//! Vault file references shared between the chat core and front-ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Entry produced by enumerating a vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultFile {
    /// Vault-relative path using `/` separators.
    pub path: String,
    /// Creation timestamp reported by storage, when available.
    pub created_at: Option<DateTime<Utc>>,
}

impl VaultFile {
    /// Build an entry without a creation timestamp.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            created_at: None,
        }
    }

    /// File stem used for display.
    pub fn name(&self) -> String {
        file_stem(&self.path)
    }

    /// Extension without the leading dot, case preserved.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.path)
    }
}

/// Document referenced as conversational context.
///
/// Context files are keyed by `path`; the chat core never owns their content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ContextFile {
    /// Vault-relative path using `/` separators.
    pub path: String,
    /// Display name (file stem).
    pub name: String,
}

impl ContextFile {
    /// Build a context file reference, deriving the display name from the path.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = file_stem(&path);
        Self { path, name }
    }

    /// Extension without the leading dot, case preserved.
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.path)
    }

    /// Parent folder of the file, empty at the vault root.
    pub fn parent(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }
}

impl From<&VaultFile> for ContextFile {
    fn from(file: &VaultFile) -> Self {
        ContextFile::new(file.path.clone())
    }
}

/// Persisted conversation transcript identified by its storage path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationRecord {
    /// Vault-relative transcript path.
    pub path: String,
    /// Display name (file stem).
    pub name: String,
    /// Creation timestamp, when storage reports one.
    pub created_at: Option<DateTime<Utc>>,
}

impl From<VaultFile> for ConversationRecord {
    fn from(file: VaultFile) -> Self {
        let name = file.name();
        Self {
            path: file.path,
            name,
            created_at: file.created_at,
        }
    }
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}

fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{ContextFile, ConversationRecord, VaultFile};
    use pretty_assertions::assert_eq;

    #[test]
    fn context_file_derives_name_and_parent() {
        let file = ContextFile::new("projects/rust/Notes.MD");
        assert_eq!(file.name, "Notes");
        assert_eq!(file.parent(), "projects/rust");
        assert_eq!(file.extension(), Some("MD".to_string()));

        let root = ContextFile::new("inbox.md");
        assert_eq!(root.parent(), "");
        assert_eq!(root.extension(), Some("md".to_string()));
        assert_eq!(VaultFile::new("README").extension(), None);
    }

    #[test]
    fn conversation_record_from_vault_file() {
        let record = ConversationRecord::from(VaultFile::new("convos/convo-20240101120000.md"));
        assert_eq!(record.name, "convo-20240101120000");
        assert_eq!(record.path, "convos/convo-20240101120000.md");
        assert_eq!(record.created_at, None);
    }
}
