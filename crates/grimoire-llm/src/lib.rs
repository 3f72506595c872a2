//! # Grimoire LLM
//!
//! Embedding and chat-completion capabilities for the Grimoire knowledge
//! base.
//!
//! ## Features
//!
//! - **Embeddings**: text embeddings for semantic search, via any
//!   Ollama-compatible endpoint
//! - **Chat completions**: OpenRouter client used by the assistant
//!   operations (summarize, ask)
//! - **Injection-friendly**: both capabilities are trait objects handed to
//!   their consumers, never hard-wired singletons
//! - **Deterministic mocks**: test stand-ins with call counters
//!
//! ## Failure policy
//!
//! Unlike local persistence, remote capabilities surface their failures as
//! typed [`LlmError`]s: the user needs to see them to retry or reconfigure.
//! A missing API credential is its own variant, [`LlmError::ApiKeyMissing`],
//! and is detected before any request is attempted.

pub mod assistant;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod openrouter;
pub mod provider;

pub use assistant::Assistant;
pub use error::{LlmError, LlmResult};
pub use mock::{MockChatProvider, MockEmbeddingProvider};
pub use ollama::OllamaEmbeddings;
pub use openrouter::OpenRouterClient;
pub use provider::{ChatProvider, EmbeddingProvider};
