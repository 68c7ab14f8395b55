//! OpenAI-compatible chat completion client.
//!
//! Targets any `/chat/completions` endpoint behind a configurable base URL
//! (DashScope's compatible mode by default upstream). Supports plain text
//! messages and multi-part user messages carrying an inline image, which
//! the vision judge uses for screenshot inspection.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LlmError, LlmResult};

/// Role of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message content: plain text, or parts for vision payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Content,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(content.into()),
        }
    }

    /// A user message pairing text with an inline PNG screenshot.
    pub fn user_with_image(text: impl Into<String>, png: &[u8]) -> Self {
        let data_url = format!("data:image/png;base64,{}", BASE64.encode(png));
        Self {
            role: Role::User,
            content: Content::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]),
        }
    }
}

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token usage reported by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Completion text plus usage.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: Usage,
}

/// Seam between the stages and the completion service.
///
/// Stages hold `Arc<dyn CompletionBackend>`; tests substitute stubs.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse>;
}

/// HTTP client for an OpenAI-compatible endpoint.
pub struct LlmClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

const MAX_RETRIES: u32 = 3;

impl LlmClient {
    /// Create a client with an enforced per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> LlmResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::NotConfigured("empty API key".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    async fn send_once(&self, request: &WireRequest<'_>) -> LlmResult<CompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(CompletionResponse {
            content,
            usage: parsed.usage.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        let wire = WireRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut last_error: Option<LlmError> = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                tokio::time::sleep(Duration::from_secs(1 << (attempt - 1))).await;
            }

            match self.send_once(&wire).await {
                Ok(response) => {
                    debug!(
                        model = %request.model,
                        prompt_tokens = response.usage.prompt_tokens,
                        completion_tokens = response.usage.completion_tokens,
                        "completion succeeded"
                    );
                    return Ok(response);
                }
                // Retry server errors, rate limits, and network failures
                Err(e @ LlmError::Network(_)) => {
                    warn!(attempt, error = %e, "completion network error, retrying");
                    last_error = Some(e);
                }
                Err(LlmError::Api { status, body }) if status >= 500 || status == 429 => {
                    warn!(attempt, status, "completion API error, retrying");
                    last_error = Some(LlmError::Api { status, body });
                }
                Err(e) => return Err(e),
            }
        }

        Err(LlmError::RetriesExhausted(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        ))
    }
}

// Wire types for the OpenAI-compatible API

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_as_plain_string() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let msg = ChatMessage::user_with_image("judge this", &[137, 80, 78, 71]);
        let json = serde_json::to_value(&msg).unwrap();
        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        let url = parts[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = LlmClient::new("https://example.test/v1", "", Duration::from_secs(5));
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            LlmClient::new("https://example.test/v1/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://example.test/v1");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "choices": [{"message": {"content": "APPROVED"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        }"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "APPROVED");
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 12);
    }
}
