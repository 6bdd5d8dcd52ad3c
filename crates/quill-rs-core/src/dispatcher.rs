//! Send a user message and record the resulting turn.

use crate::conversations::ConversationStore;
use crate::error::CoreError;
use crate::llm::{CompletionProvider, CompletionRequest};
use crate::prompt::{self, SYSTEM_INSTRUCTION};
use crate::transcript;
use crate::vault::Vault;
use log::{debug, info};
use quill_rs_protocol::ContextFile;
use std::sync::Arc;

/// Coordinates prompt assembly, completion, and transcript updates.
pub struct MessageDispatcher {
    conversations: Arc<ConversationStore>,
    vault: Arc<dyn Vault>,
    provider: Arc<dyn CompletionProvider>,
}

impl MessageDispatcher {
    pub fn new(
        conversations: Arc<ConversationStore>,
        vault: Arc<dyn Vault>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            conversations,
            vault,
            provider,
        }
    }

    /// Send `text` with the given context files and append the turn.
    ///
    /// The transcript is only written after the completion succeeds.
    pub async fn send(&self, text: &str, context: &[ContextFile]) -> Result<String, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyMessage);
        }

        let path = match self.conversations.current().await {
            Some(path) => path,
            None => {
                info!("no current conversation, creating one");
                self.conversations.create_conversation().await?
            }
        };

        let history = self.vault.read(&path).await?;
        let mut entries = Vec::with_capacity(context.len());
        for file in context {
            let content = self.vault.read(&file.path).await?;
            entries.push((file.clone(), content));
        }
        let context_text = prompt::context_block(&entries);
        let request = CompletionRequest {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: prompt::build_prompt(text, &context_text, &history),
        };
        debug!(
            "dispatching message (path={path}, context_files={}, prompt_len={})",
            entries.len(),
            request.prompt.len()
        );

        let answer = self.provider.complete(&request).await?;

        let latest = self.vault.read(&path).await?;
        let updated = transcript::encode_turn(&latest, text, &answer);
        self.vault.modify(&path, &updated).await?;
        info!("recorded turn (path={path}, answer_len={})", answer.len());
        Ok(answer)
    }
}
