//! Key namespaces for the persisted domains.
//!
//! Singleton blobs use a fixed key; per-page blobs compose a prefix with the
//! page id. Fixed prefixes keep the domains collision-free inside one store.

use uuid::Uuid;

/// Page index: the full `Vec<PageMetadata>` as one JSON blob.
pub const PAGES: &str = "grimoire_pages";

/// Structured-database map: `HashMap<Uuid, Database>` as one JSON blob.
pub const DATABASES: &str = "grimoire_databases";

/// Application settings singleton.
pub const SETTINGS: &str = "grimoire_settings";

/// Persisted UI state singleton.
pub const UI_STATE: &str = "grimoire_ui_state";

/// Embedding index: `HashMap<Uuid, Vec<f32>>` as one JSON blob.
pub const EMBEDDINGS: &str = "grimoire_embeddings";

/// Prefix for per-page rich-content blobs.
pub const CONTENT_PREFIX: &str = "grimoire_content_";

/// Prefix for per-page chat-history blobs.
pub const CHATS_PREFIX: &str = "grimoire_chats_";

/// Key of a page's rich-content blob.
pub fn content(page_id: Uuid) -> String {
    format!("{CONTENT_PREFIX}{page_id}")
}

/// Key of a page's chat-history blob.
pub fn chats(page_id: Uuid) -> String {
    format!("{CHATS_PREFIX}{page_id}")
}

/// Recover the page id from a prefixed key, if it parses.
pub fn page_id(key: &str, prefix: &str) -> Option<Uuid> {
    key.strip_prefix(prefix)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}
