//! In-memory cache over per-page rich-content blobs.
//!
//! Lazily populated from the durable store, write-through on mutation. No
//! eviction: page counts are small and the cache lives only as long as the
//! process. Growth is a known scaling limit, not a bug.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use grimoire_core::EMPTY_DOCUMENT;
use grimoire_kv::{keys, KeyValueStore};

/// Page-id → serialized rich-content cache with the durable store as the
/// backing authority.
pub struct ContentCache {
    kv: Arc<dyn KeyValueStore>,
    cache: HashMap<Uuid, String>,
}

impl ContentCache {
    /// Create an empty cache over the given store.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            cache: HashMap::new(),
        }
    }

    /// Content for a page.
    ///
    /// Cached value if present, otherwise read-through from the durable
    /// store. Pages with no stored content anywhere get the empty-document
    /// fallback, which is not cached.
    pub fn get(&mut self, page_id: Uuid) -> String {
        if let Some(content) = self.cache.get(&page_id) {
            return content.clone();
        }

        if let Some(content) = self.kv.get(&keys::content(page_id)) {
            self.cache.insert(page_id, content.clone());
            return content;
        }

        EMPTY_DOCUMENT.to_string()
    }

    /// Write-through: update the cache and the durable store synchronously.
    pub fn set(&mut self, page_id: Uuid, content: impl Into<String>) {
        let content = content.into();
        self.kv.set(&keys::content(page_id), &content);
        self.cache.insert(page_id, content);
    }

    /// Remove a page's content from both layers.
    pub fn remove(&mut self, page_id: Uuid) {
        self.cache.remove(&page_id);
        self.kv.remove(&keys::content(page_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_kv::MemoryKv;

    fn cache() -> (MemoryKv, ContentCache) {
        let kv = MemoryKv::new();
        let cache = ContentCache::new(Arc::new(kv.clone()));
        (kv, cache)
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let (_, mut cache) = cache();
        let id = Uuid::new_v4();

        cache.set(id, "<p>hello</p>");
        assert_eq!(cache.get(id), "<p>hello</p>");
    }

    #[test]
    fn test_read_through_after_restart() {
        let (kv, mut cache) = cache();
        let id = Uuid::new_v4();
        cache.set(id, "<p>durable</p>");

        // Fresh cache over the same store simulates a process restart.
        let mut restarted = ContentCache::new(Arc::new(kv));
        assert_eq!(restarted.get(id), "<p>durable</p>");
    }

    #[test]
    fn test_missing_content_falls_back_to_empty_document() {
        let (_, mut cache) = cache();
        assert_eq!(cache.get(Uuid::new_v4()), EMPTY_DOCUMENT);
    }

    #[test]
    fn test_remove_clears_both_layers() {
        let (kv, mut cache) = cache();
        let id = Uuid::new_v4();
        cache.set(id, "<p>x</p>");

        cache.remove(id);

        assert_eq!(cache.get(id), EMPTY_DOCUMENT);
        assert!(kv.get(&keys::content(id)).is_none());
    }
}
