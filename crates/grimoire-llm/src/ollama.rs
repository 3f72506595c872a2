//! Ollama embedding provider implementation.
//!
//! Talks to any Ollama-compatible `/api/embeddings` endpoint. The default
//! model is a small local embedder; dimensions are whatever the model
//! returns, the index does not care.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::provider::EmbeddingProvider;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "nomic-embed-text";

/// Ollama embedding provider.
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaEmbeddings {
    /// Create a provider; `None` falls back to the local default endpoint
    /// and model.
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(60),
        }
    }

    /// Model this provider embeds with.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api { status, message });
        }

        let parsed: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Empty embedding in response".to_string(),
            ));
        }

        debug!(
            model = %self.model,
            dimensions = parsed.embedding.len(),
            "Generated embedding"
        );
        Ok(parsed.embedding)
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = OllamaEmbeddings::new(None, None);
        assert_eq!(provider.provider_name(), "Ollama");
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_custom_endpoint() {
        let provider = OllamaEmbeddings::new(
            Some("http://embed.local:11434".to_string()),
            Some("all-minilm".to_string()),
        );
        assert_eq!(provider.base_url, "http://embed.local:11434");
        assert_eq!(provider.model(), "all-minilm");
    }
}
