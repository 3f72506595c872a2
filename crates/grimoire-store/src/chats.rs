//! Per-page chat session lists.
//!
//! Each page's sessions persist as one blob under a per-page key. Callers
//! own the entire session list for a page — saving replaces it wholesale,
//! there are no merge semantics.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use grimoire_core::ChatSession;
use grimoire_kv::{keys, KeyValueStore};

use crate::write_json;

/// Owner of every page's chat history.
pub struct ChatStore {
    kv: Arc<dyn KeyValueStore>,
    sessions: HashMap<Uuid, Vec<ChatSession>>,
}

impl ChatStore {
    /// Load all chat histories by scanning the chats key prefix. Blobs that
    /// fail to parse are skipped with a log line.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut sessions = HashMap::new();
        for key in kv.list_keys(keys::CHATS_PREFIX) {
            let Some(page_id) = keys::page_id(&key, keys::CHATS_PREFIX) else {
                continue;
            };
            let Some(raw) = kv.get(&key) else { continue };
            match serde_json::from_str::<Vec<ChatSession>>(&raw) {
                Ok(list) => {
                    sessions.insert(page_id, list);
                }
                Err(e) => warn!(key, error = %e, "Malformed chat history, skipping"),
            }
        }
        Self { kv, sessions }
    }

    /// Sessions for a page, oldest first; empty if the page has none.
    pub fn sessions(&self, page_id: Uuid) -> &[ChatSession] {
        self.sessions.get(&page_id).map_or(&[], Vec::as_slice)
    }

    /// Replace-and-persist a page's whole session list.
    pub fn save(&mut self, page_id: Uuid, sessions: Vec<ChatSession>) {
        write_json(self.kv.as_ref(), &keys::chats(page_id), &sessions);
        self.sessions.insert(page_id, sessions);
    }

    /// Drop a page's chat history from both layers (page-delete cascade).
    pub fn remove(&mut self, page_id: Uuid) {
        self.sessions.remove(&page_id);
        self.kv.remove(&keys::chats(page_id));
    }
}
