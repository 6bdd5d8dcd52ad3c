//! Chat services bundle used by the Quill TUI.

use anyhow::Result;
use log::{debug, info};
use quill_rs_config::SettingsStore;
use quill_rs_core::{
    Clock, CommandRegistry, CompletionProvider, ConversationStore, MessageDispatcher, Renderer,
    SearchHit, Vault, search_context,
};
use quill_rs_protocol::{ContextFile, ConversationRecord, Message};
use std::sync::Arc;

/// Local client over the vault, settings, and completion provider.
#[derive(Clone)]
pub struct QuillClient {
    settings: Arc<SettingsStore>,
    vault: Arc<dyn Vault>,
    renderer: Arc<dyn Renderer>,
    conversations: Arc<ConversationStore>,
    dispatcher: Arc<MessageDispatcher>,
}

impl QuillClient {
    /// Wire the conversation store and dispatcher over shared services.
    pub fn new(
        settings: Arc<SettingsStore>,
        vault: Arc<dyn Vault>,
        renderer: Arc<dyn Renderer>,
        provider: Arc<dyn CompletionProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let conversations = Arc::new(ConversationStore::new(
            vault.clone(),
            settings.clone(),
            clock,
        ));
        let dispatcher = Arc::new(MessageDispatcher::new(
            conversations.clone(),
            vault.clone(),
            provider,
        ));
        Self {
            settings,
            vault,
            renderer,
            conversations,
            dispatcher,
        }
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Hotkey bindings from the current settings.
    pub fn registry(&self) -> CommandRegistry {
        self.settings
            .read(|settings| CommandRegistry::from_settings(&settings.shortcuts))
    }

    pub fn conversation_folder(&self) -> String {
        self.settings
            .read(|settings| settings.conversation_folder.clone())
    }

    pub fn include_all_open_files(&self) -> bool {
        self.settings.read(|settings| settings.include_all_open_files)
    }

    /// Persist the include-all-open-files toggle.
    pub fn set_include_all_open_files(&self, include: bool) -> Result<()> {
        self.settings
            .update(|settings| settings.include_all_open_files = include)?;
        info!("include all open files set (enabled={include})");
        Ok(())
    }

    /// Make sure the conversation folder exists.
    pub async fn prepare(&self) -> Result<()> {
        self.conversations.ensure_folder().await?;
        Ok(())
    }

    pub async fn list_conversations(&self) -> Result<Vec<ConversationRecord>> {
        let mut records = self.conversations.list_conversations().await?;
        records.sort_by(|a, b| b.path.cmp(&a.path));
        debug!("listed conversations (count={})", records.len());
        Ok(records)
    }

    /// Markdown notes that can be opened in the workspace.
    pub async fn list_notes(&self) -> Result<Vec<ContextFile>> {
        let notes: Vec<ContextFile> = self
            .vault
            .list_files()
            .await?
            .iter()
            .filter(|file| file.extension().as_deref() == Some("md"))
            .map(ContextFile::from)
            .collect();
        debug!("listed notes (count={})", notes.len());
        Ok(notes)
    }

    pub async fn current_conversation(&self) -> Option<String> {
        self.conversations.current().await
    }

    pub async fn load_current(&self) -> Vec<Message> {
        self.conversations.load_current().await
    }

    pub async fn create_conversation(&self) -> Result<String> {
        Ok(self.conversations.create_conversation().await?)
    }

    /// Reopen the current conversation, creating one when none exists.
    pub async fn open_last_conversation(&self) -> Result<(String, Vec<Message>)> {
        let path = self.conversations.open_last_conversation().await?;
        let messages = self.conversations.load_current().await;
        Ok((path, messages))
    }

    /// Switch to `path` and load its messages.
    pub async fn activate_conversation(&self, path: &str) -> Result<Vec<Message>> {
        self.conversations.switch_to(path)?;
        Ok(self.conversations.load_current().await)
    }

    /// Send `text` with `context` and return the assistant's answer.
    pub async fn send_message(&self, text: &str, context: &[ContextFile]) -> Result<String> {
        Ok(self.dispatcher.send(text, context).await?)
    }

    pub async fn search(&self, query: &str, selected: &[ContextFile]) -> Vec<SearchHit> {
        search_context(
            self.vault.as_ref(),
            self.renderer.as_ref(),
            query,
            selected,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::QuillClient;
    use pretty_assertions::assert_eq;
    use quill_rs_config::{QuillSettings, SettingsStore};
    use quill_rs_core::{FsVault, SystemClock};
    use quill_rs_test_utils::FixedCompletion;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn client(temp: &TempDir, answer: &str) -> QuillClient {
        let settings_path = QuillSettings::default_path(temp.path());
        let settings = Arc::new(SettingsStore::load(&settings_path).expect("settings"));
        let vault = Arc::new(FsVault::new(temp.path()).expect("vault"));
        QuillClient::new(
            settings,
            vault,
            Arc::new(crate::markdown::TerminalRenderer),
            Arc::new(FixedCompletion::new(answer)),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn send_creates_conversation_and_reloads_it() {
        let temp = TempDir::new().expect("tmp");
        let client = client(&temp, "hello back");
        client.prepare().await.expect("prepare");

        let answer = client.send_message("hello", &[]).await.expect("send");
        assert_eq!(answer, "hello back");

        let path = client.current_conversation().await.expect("current");
        let (reopened, messages) = client.open_last_conversation().await.expect("open");
        assert_eq!(reopened, path);
        assert_eq!(messages.len(), 2);
        assert_eq!(client.list_conversations().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn notes_list_only_markdown_and_skips_settings() {
        let temp = TempDir::new().expect("tmp");
        std::fs::write(temp.path().join("a.md"), "# A").expect("write");
        std::fs::write(temp.path().join("b.txt"), "b").expect("write");
        let client = client(&temp, "unused");
        client.set_include_all_open_files(true).expect("toggle");

        let notes: Vec<String> = client
            .list_notes()
            .await
            .expect("notes")
            .into_iter()
            .map(|note| note.path)
            .collect();
        assert_eq!(notes, vec!["a.md"]);
        assert!(client.include_all_open_files());
    }

    #[tokio::test]
    async fn search_previews_use_terminal_renderer() {
        let temp = TempDir::new().expect("tmp");
        std::fs::write(temp.path().join("roadmap.md"), "# Roadmap\n\n- ship").expect("write");
        let client = client(&temp, "unused");

        let hits = client.search("road", &[]).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].preview, "Roadmap\n\n- ship");
    }
}
