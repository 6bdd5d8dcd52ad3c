use async_trait::async_trait;
use parking_lot::Mutex;
use quill_rs_core::{CompletionProvider, CompletionRequest, LlmError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FixedCompletion {
    response: String,
}

impl FixedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FixedCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        Ok(self.response.clone())
    }
}

/// Provider that always fails like a transport error.
#[derive(Debug, Clone)]
pub struct FailingCompletion {
    message: String,
}

impl FailingCompletion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FailingCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        Err(LlmError::Request {
            status: None,
            message: self.message.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordingCompletion {
    response: String,
    seen: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl RecordingCompletion {
    pub fn new(response: impl Into<String>) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                response: response.into(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl CompletionProvider for RecordingCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.seen.lock().push(request.clone());
        Ok(self.response.clone())
    }
}
