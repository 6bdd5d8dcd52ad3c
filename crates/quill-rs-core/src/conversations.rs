//! Conversation transcripts stored in the vault.

use crate::error::CoreError;
use crate::transcript;
use crate::vault::Vault;
use chrono::{Local, NaiveDateTime, TimeDelta};
use log::{info, warn};
use parking_lot::Mutex;
use quill_rs_config::SettingsStore;
use quill_rs_protocol::{ConversationRecord, Message};
use std::sync::Arc;

const FILE_PREFIX: &str = "convo-";
const FILE_STAMP: &str = "%Y%m%d%H%M%S";

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Creates, lists, and tracks the current conversation transcript.
pub struct ConversationStore {
    vault: Arc<dyn Vault>,
    settings: Arc<SettingsStore>,
    clock: Arc<dyn Clock>,
    last_issued: Mutex<Option<NaiveDateTime>>,
}

impl ConversationStore {
    pub fn new(vault: Arc<dyn Vault>, settings: Arc<SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            vault,
            settings,
            clock,
            last_issued: Mutex::new(None),
        }
    }

    fn folder(&self) -> String {
        self.settings
            .read(|settings| settings.conversation_folder.trim_matches('/').to_string())
    }

    /// Create the conversation folder if it is missing.
    pub async fn ensure_folder(&self) -> Result<(), CoreError> {
        let folder = self.folder();
        self.vault.create_folder(&folder).await?;
        Ok(())
    }

    /// Markdown transcripts directly or indirectly under the conversation folder.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationRecord>, CoreError> {
        let prefix = format!("{}/", self.folder());
        let records = self
            .vault
            .list_files()
            .await?
            .into_iter()
            .filter(|file| file.path.starts_with(&prefix))
            .filter(|file| file.extension().as_deref() == Some("md"))
            .map(ConversationRecord::from)
            .collect();
        Ok(records)
    }

    /// Create a new transcript, make it current, and persist the pointer.
    pub async fn create_conversation(&self) -> Result<String, CoreError> {
        self.ensure_folder().await?;
        let folder = self.folder();
        let started_at = self.next_timestamp();
        let mut stamp = started_at;
        let mut path = conversation_path(&folder, &stamp);
        while self.vault.exists(&path).await? {
            stamp += TimeDelta::seconds(1);
            path = conversation_path(&folder, &stamp);
        }
        *self.last_issued.lock() = Some(stamp);

        self.vault
            .create(&path, &transcript::header(&started_at))
            .await?;
        self.settings.update(|settings| {
            settings.current_conversation_path = Some(path.clone());
        })?;
        info!("created conversation (path={path})");
        Ok(path)
    }

    /// Clock reading bumped past the last timestamp this store issued.
    fn next_timestamp(&self) -> NaiveDateTime {
        let now = self.clock.now();
        match *self.last_issued.lock() {
            Some(last) if now <= last => last + TimeDelta::seconds(1),
            _ => now,
        }
    }

    /// Make `path` the current conversation without checking that it exists.
    pub fn switch_to(&self, path: &str) -> Result<(), CoreError> {
        self.settings.update(|settings| {
            settings.current_conversation_path = Some(path.to_string());
        })?;
        info!("switched conversation (path={path})");
        Ok(())
    }

    /// Current conversation path if it still exists in the vault.
    pub async fn current(&self) -> Option<String> {
        let path = self
            .settings
            .read(|settings| settings.current_conversation_path.clone())?;
        match self.vault.exists(&path).await {
            Ok(true) => Some(path),
            Ok(false) => None,
            Err(err) => {
                warn!("failed to check current conversation (path={path}, error={err})");
                None
            }
        }
    }

    /// Decoded messages of the current conversation, empty when unavailable.
    pub async fn load_current(&self) -> Vec<Message> {
        let Some(path) = self.current().await else {
            return Vec::new();
        };
        match self.vault.read(&path).await {
            Ok(text) => transcript::decode(&text),
            Err(err) => {
                warn!("failed to load conversation (path={path}, error={err})");
                Vec::new()
            }
        }
    }

    /// Current conversation, or a new one when none is recorded.
    pub async fn open_last_conversation(&self) -> Result<String, CoreError> {
        match self.current().await {
            Some(path) => Ok(path),
            None => self.create_conversation().await,
        }
    }
}

fn conversation_path(folder: &str, stamp: &NaiveDateTime) -> String {
    format!("{folder}/{FILE_PREFIX}{}.md", stamp.format(FILE_STAMP))
}

#[cfg(test)]
mod tests {
    use super::conversation_path;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_embeds_compact_timestamp() {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|date| date.and_hms_opt(3, 4, 5))
            .expect("timestamp");
        assert_eq!(
            conversation_path("convos", &stamp),
            "convos/convo-20240102030405.md"
        );
    }
}
