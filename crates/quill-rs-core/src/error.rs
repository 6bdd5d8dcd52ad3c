//! Error types for the chat core.

use quill_rs_config::ConfigError;
use thiserror::Error;

/// Errors returned by vault storage.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Underlying filesystem failure.
    #[error("vault io error: {0}")]
    Io(#[from] std::io::Error),
    /// The path does not exist.
    #[error("file not found: {0}")]
    NotFound(String),
    /// `create` was asked to overwrite an existing file.
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    /// The path is empty or escapes the vault root.
    #[error("invalid vault path: {0}")]
    InvalidPath(String),
}

/// Errors returned by the completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured.
    #[error("missing API key")]
    MissingApiKey,
    /// Network failure or non-success status.
    #[error("completion request failed (status={status:?}): {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },
    /// The endpoint answered but without usable text.
    #[error("unexpected completion response: {0}")]
    UnexpectedResponse(String),
}

/// Errors returned by chat operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Completion(#[from] LlmError),
    #[error(transparent)]
    Settings(#[from] ConfigError),
    /// Blank user input.
    #[error("message is empty")]
    EmptyMessage,
    /// Markdown rendering failed.
    #[error("render error: {0}")]
    Render(String),
}
