use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::GenerationError;

const DEFAULT_CONNECTION_TIMEOUT_SECONDS: u64 = 10;
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// One completion call against one backend model.
#[derive(Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub api_key: String,
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A chat-completion API that turns a prompt into message text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the message content of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a chat-completion envelope.
pub fn parse_completion_envelope(model: &str, body: &str) -> Result<String, GenerationError> {
    let envelope: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::MalformedPayload {
            model: model.to_string(),
            reason: format!("invalid response envelope: {}", e),
        })?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::MalformedPayload {
            model: model.to_string(),
            reason: "response has no message content".to_string(),
        })
}

/// OpenRouter-compatible `/chat/completions` client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// `timeout` bounds each request; a timed out request counts as a
    /// transport failure for that model.
    pub fn new(
        base_url: &str,
        referer: &str,
        title: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECONDS))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            referer: referer.to_string(),
            title: title.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!("Sending completion request for model {}", request.model);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", request.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::BackendUnavailable {
                model: request.model.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::BackendRejected {
                model: request.model.clone(),
                status: status.as_u16(),
                body: truncate(&error_text, MAX_ERROR_BODY_LENGTH),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::BackendUnavailable {
                model: request.model.clone(),
                reason: format!("failed to read response body: {}", e),
            })?;

        parse_completion_envelope(&request.model, &text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
