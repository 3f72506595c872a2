//! Capability traits and common functionality.

use std::sync::Arc;

use async_trait::async_trait;
use grimoire_core::ChatMessage;

use crate::error::LlmResult;

/// Text embedding capability.
///
/// Implementations should be deterministic per input text so that cached
/// vectors stay meaningful, though nothing here enforces it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing service is unreachable or answers
    /// with something other than a vector.
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;

    /// Human-readable provider name for logs.
    fn provider_name(&self) -> &str;
}

/// Chat completion capability.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run the conversation through the model and return the assistant's
    /// reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String>;

    /// Human-readable provider name for logs.
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        (**self).embed(text).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: ChatProvider + ?Sized> ChatProvider for Arc<T> {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        (**self).complete(messages).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
