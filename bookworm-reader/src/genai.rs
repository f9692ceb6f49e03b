//! Generative-text client (OpenAI chat-completions shape)
//!
//! One attempt per call, no retries, no deadline: the effect runner bounds
//! each request with the configured timeout. Failures come back as
//! [`NetworkError`] values; the effect runner turns them into
//! `AssistantAction::DidError` so they never cross the dispatch path.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GenAiConfig;

/// Returned when the service answers without any choice
pub const FALLBACK_RESPONSE: &str = "No response from assistant";

/// Failure talking to the generative-text service
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("service responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HTTP client for the chat-completions endpoint
#[derive(Clone, Debug)]
pub struct GenAiClient {
    http: reqwest::Client,
    config: GenAiConfig,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(NetworkError::Request)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    /// Send `prompt` as a single user message and return the first
    /// choice's content, or [`FALLBACK_RESPONSE`] when there is none.
    pub async fn get_response(&self, prompt: &str) -> Result<String, NetworkError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage::user(prompt)],
        };

        let mut request = self.http.post(self.config.completions_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(model = %self.config.model, "Sending completion request");
        let response = request.send().await.map_err(NetworkError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status));
        }

        let bytes = response.bytes().await.map_err(NetworkError::Request)?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_else(|| FALLBACK_RESPONSE.to_string()))
    }
}
