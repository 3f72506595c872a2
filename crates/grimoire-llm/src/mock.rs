//! Mock providers for testing.
//!
//! Deterministic, dependency-free stand-ins for the capability traits. The
//! embedding mock derives a stable pseudo-vector from the input text unless
//! a fixed response is registered, and counts calls so tests can prove
//! short-circuit paths never reached the provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use grimoire_core::ChatMessage;
use parking_lot::Mutex;

use crate::error::{LlmError, LlmResult};
use crate::provider::{ChatProvider, EmbeddingProvider};

/// Deterministic mock [`EmbeddingProvider`].
#[derive(Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    fixed: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockEmbeddingProvider {
    /// Provider emitting vectors of the given length.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            fixed: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// Provider that fails every call.
    pub fn failing() -> Self {
        Self {
            dimensions: 0,
            fixed: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    /// Register an exact vector to return for `text`.
    pub fn set_response(&self, text: impl Into<String>, embedding: Vec<f32>) {
        self.fixed.lock().insert(text.into(), embedding);
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Stable pseudo-embedding for arbitrary text.
    fn synthesize(&self, text: &str) -> Vec<f32> {
        let mut seed = 0u64;
        for byte in text.bytes() {
            seed = seed.wrapping_mul(31).wrapping_add(u64::from(byte));
        }
        (0..self.dimensions)
            .map(|i| {
                let x = seed.wrapping_add(i as u64).wrapping_mul(6364136223846793005);
                ((x >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::Http("mock provider configured to fail".to_string()));
        }
        if let Some(fixed) = self.fixed.lock().get(text) {
            return Ok(fixed.clone());
        }
        Ok(self.synthesize(text))
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

/// Mock [`ChatProvider`] that records every conversation it is handed.
#[derive(Clone)]
pub struct MockChatProvider {
    reply: String,
    conversations: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    fail: bool,
}

impl MockChatProvider {
    /// Provider answering every completion with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            conversations: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Provider that fails every call.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            conversations: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Messages of the most recent completion call.
    pub fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.conversations.lock().last().cloned()
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.conversations.lock().len()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        self.conversations.lock().push(messages.to_vec());
        if self.fail {
            return Err(LlmError::Http("mock provider configured to fail".to_string()));
        }
        Ok(self.reply.clone())
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::with_dimensions(8);

        let a = provider.embed("hello").await.unwrap();
        let b = provider.embed("hello").await.unwrap();
        let c = provider.embed("goodbye").await.unwrap();

        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fixed_responses_win() {
        let provider = MockEmbeddingProvider::with_dimensions(3);
        provider.set_response("query", vec![1.0, 0.0, 0.0]);

        assert_eq!(provider.embed("query").await.unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = MockEmbeddingProvider::failing();
        assert!(provider.embed("anything").await.is_err());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_chat_mock_records_conversations() {
        let provider = MockChatProvider::replying("pong");

        let reply = provider.complete(&[ChatMessage::user("ping")]).await.unwrap();
        assert_eq!(reply, "pong");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_messages().unwrap()[0].content, "ping");
    }
}
