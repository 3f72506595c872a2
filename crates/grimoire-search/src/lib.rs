//! # Grimoire Search
//!
//! Embedding-based semantic search over the page set.
//!
//! The index is a page-id → vector map persisted as one blob. Embeddings
//! come from an injected [`EmbeddingProvider`](grimoire_llm::EmbeddingProvider);
//! the index never computes them itself. Indexing is caller-triggered —
//! vectors go stale when content changes until the caller re-indexes — and
//! ranking is plain cosine similarity computed in-process.

pub mod index;

pub use index::{SearchResult, SemanticIndex, DEFAULT_SEARCH_LIMIT};
