//! Chat core for Quill.
//!
//! This crate owns fuzzy matching, the transcript format, context selection,
//! conversation storage, and message dispatch. Storage, rendering, and the
//! completion endpoint are injected through the [`Vault`], [`Renderer`], and
//! [`CompletionProvider`] traits.

pub mod commands;
pub mod context;
pub mod conversations;
pub mod dispatcher;
pub mod error;
pub mod fuzzy;
pub mod llm;
pub mod prompt;
pub mod render;
pub mod search;
pub mod transcript;
pub mod vault;

pub use commands::{CommandId, CommandRegistry};
pub use context::{ContextSelector, OpenDocuments};
pub use conversations::{Clock, ConversationStore, SystemClock};
pub use dispatcher::MessageDispatcher;
pub use error::{CoreError, LlmError, VaultError};
pub use llm::{AnthropicClient, CompletionProvider, CompletionRequest};
pub use render::{PlainRenderer, Renderer};
pub use search::{SearchHit, search_context};
pub use vault::{FsVault, Vault};
