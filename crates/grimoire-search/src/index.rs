//! The semantic index: vector storage, markup stripping, cosine ranking.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use grimoire_core::PageMetadata;
use grimoire_kv::{keys, KeyValueStore};
use grimoire_llm::EmbeddingProvider;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub title: String,
    pub score: f32,
}

/// Page-id → embedding map with an injected embedding capability.
pub struct SemanticIndex {
    kv: Arc<dyn KeyValueStore>,
    provider: Arc<dyn EmbeddingProvider>,
    embeddings: HashMap<Uuid, Vec<f32>>,
}

impl SemanticIndex {
    /// Load the persisted index (empty when absent or malformed).
    pub fn load(kv: Arc<dyn KeyValueStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let embeddings = kv
            .get(keys::EMBEDDINGS)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(map) => Some(map),
                Err(e) => {
                    warn!(error = %e, "Malformed embedding index, starting empty");
                    None
                }
            })
            .unwrap_or_default();
        Self {
            kv,
            provider,
            embeddings,
        }
    }

    /// Number of indexed pages.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Embed a page's content and store the vector.
    ///
    /// Markup is stripped to plain text first; if nothing remains the call
    /// is a silent no-op. Embedding failures are logged and leave the index
    /// unchanged — stale but consistent.
    pub async fn index_page(&mut self, page_id: Uuid, raw_content: &str) {
        let plain = strip_markup(raw_content);
        if plain.is_empty() {
            return;
        }

        match self.provider.embed(&plain).await {
            Ok(embedding) => {
                debug!(%page_id, dimensions = embedding.len(), "Indexed page");
                self.embeddings.insert(page_id, embedding);
                self.persist();
            }
            Err(e) => {
                warn!(%page_id, error = %e, "Indexing failed");
            }
        }
    }

    /// Drop a page's vector (page-delete cleanup).
    pub fn remove(&mut self, page_id: Uuid) {
        if self.embeddings.remove(&page_id).is_some() {
            self.persist();
        }
    }

    /// Rank `pages` against `query` by cosine similarity.
    ///
    /// An empty (or whitespace-only) query returns no results without
    /// calling the embedding provider. Pages without a stored vector are
    /// excluded rather than scored zero. Equal scores keep the relative
    /// order of `pages` (the sort is stable). A query-embedding failure
    /// yields an empty result, logged.
    pub async fn search(
        &self,
        query: &str,
        pages: &[PageMetadata],
        limit: usize,
    ) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let query_embedding = match self.provider.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Query embedding failed");
                return Vec::new();
            }
        };

        let mut results: Vec<SearchResult> = pages
            .iter()
            .filter_map(|page| {
                let embedding = self.embeddings.get(&page.id)?;
                Some(SearchResult {
                    id: page.id,
                    title: page.title.clone(),
                    score: cosine_similarity(&query_embedding, embedding),
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }

    fn persist(&self) {
        match serde_json::to_string(&self.embeddings) {
            Ok(raw) => self.kv.set(keys::EMBEDDINGS, &raw),
            Err(e) => warn!(error = %e, "Failed to serialize embedding index"),
        }
    }
}

/// Strip markup tags and collapse whitespace.
fn strip_markup(content: &str) -> String {
    let without_tags = TAG_RE.replace_all(content, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
