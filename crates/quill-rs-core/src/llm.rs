//! Completion provider seam and the Anthropic Messages API client.

use crate::error::LlmError;
use async_trait::async_trait;
use log::{debug, warn};
use quill_rs_config::ApiConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
}

/// Produces assistant text for a prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Client for the Anthropic Messages endpoint.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: ApiConfig,
}

impl AnthropicClient {
    /// Build a client. An empty `api_key` falls back to `ANTHROPIC_API_KEY`.
    pub fn new(api_key: impl Into<String>, config: ApiConfig) -> Self {
        let mut api_key = api_key.into();
        if api_key.trim().is_empty() {
            api_key = env::var(API_KEY_ENV).unwrap_or_default();
        }
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    /// Override the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> CreateMessageRequest<'a> {
        CreateMessageRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &request.system,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![ContentBlock {
                    kind: "text",
                    text: &request.prompt,
                }],
            }],
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let body = self.build_body(request);
        debug!(
            "sending completion request (model={}, prompt_len={})",
            self.config.model,
            request.prompt.len()
        );
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.config.anthropic_version)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| LlmError::Request {
                status: err.status().map(|status| status.as_u16()),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!("completion request rejected (status={status})");
            return Err(map_http_error(status, &body_text));
        }

        let parsed: serde_json::Value = response.json().await.map_err(|err| {
            LlmError::UnexpectedResponse(format!("response body is not JSON: {err}"))
        })?;
        extract_text(&parsed)
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
struct ContentBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Text of the first content block; anything else is an unexpected shape.
fn extract_text(value: &serde_json::Value) -> Result<String, LlmError> {
    let text = value
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(|text| text.as_str())
        .ok_or_else(|| LlmError::UnexpectedResponse("missing content[0].text".to_string()))?;
    if text.is_empty() {
        return Err(LlmError::UnexpectedResponse("empty content[0].text".to_string()));
    }
    Ok(text.to_string())
}

fn map_http_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });
    LlmError::Request {
        status: Some(status.as_u16()),
        message,
    }
}
