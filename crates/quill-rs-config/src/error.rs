//! Error types for settings loading and validation.

use thiserror::Error;

/// Errors returned while loading, validating, or persisting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a settings file failed.
    #[error("failed to access settings: {0}")]
    Io(#[from] std::io::Error),
    /// Parsing a settings file failed.
    #[error("failed to parse settings: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Converting JSON values failed.
    #[error("failed to decode settings: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A specific field failed validation.
    #[error("invalid settings at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid settings: {0}")]
    Invalid(String),
}
