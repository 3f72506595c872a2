//! OpenRouter chat provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use grimoire_core::{ChatMessage, MessageRole};
use serde::Deserialize;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::provider::ChatProvider;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter chat completion client.
///
/// The API key comes from user settings; an empty key fails fast with
/// [`LlmError::ApiKeyMissing`] before any request is made.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Create a client for the given credential and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Builder-style: override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model requests are routed to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// OpenRouter speaks the OpenAI chat-completions wire format.
#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    choices: Vec<CompletionsChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionsChoice {
    message: CompletionsMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionsMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        if self.api_key.is_empty() {
            return Err(LlmError::ApiKeyMissing);
        }

        let api_request = serde_json::json!({
            "model": self.model,
            "messages": messages.iter().map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            }).collect::<Vec<_>>(),
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, messages = messages.len(), "Requesting chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Prefer the API's own error message when the body carries one.
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(LlmError::Api { status, message });
        }

        let parsed: CompletionsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        Ok(choice.message.content.clone().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        // Unroutable base URL: if the client tried the network the error
        // would be Http, not ApiKeyMissing.
        let client = OpenRouterClient::new("", "openai/gpt-5.2")
            .with_base_url("http://127.0.0.1:1/api/v1");

        let result = client.complete(&[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(LlmError::ApiKeyMissing)));
    }

    #[test]
    fn test_client_construction() {
        let client = OpenRouterClient::new("sk-or-test", "openai/gpt-5.2");
        assert_eq!(client.provider_name(), "OpenRouter");
        assert_eq!(client.model(), "openai/gpt-5.2");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_error_body_extraction() {
        let body = r#"{"error": {"message": "model not found"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.and_then(|e| e.message).as_deref(),
            Some("model not found")
        );
    }
}
