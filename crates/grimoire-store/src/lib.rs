//! # Grimoire Store
//!
//! The persistent document store of the Grimoire knowledge base: the page
//! tree, per-page rich content, embedded structured databases, per-page chat
//! history, and the settings/UI-state singletons.
//!
//! Every store is an explicit, constructible object holding an injected
//! [`KeyValueStore`](grimoire_kv::KeyValueStore) handle — no globals — so
//! multiple instances can coexist (one per test, for example). Mutations are
//! write-through: each one persists its domain synchronously before
//! returning. Storage faults never escape a store; they degrade to safe
//! defaults and a log line.
//!
//! [`Workspace`] is the composition root: it loads every store, performs the
//! one permitted startup side effect (seeding a welcome page into an empty
//! store), and owns the operations that must touch more than one store
//! (delete cascades, content writes that bump page timestamps).

pub mod chats;
pub mod content;
pub mod databases;
pub mod pages;
pub mod settings;
pub mod workspace;

pub use chats::ChatStore;
pub use content::ContentCache;
pub use databases::DatabaseStore;
pub use pages::PageStore;
pub use settings::{SettingsStore, UiStateStore};
pub use workspace::Workspace;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use grimoire_kv::KeyValueStore;

/// Read a JSON blob, falling back to `None` when the key is absent or the
/// blob is malformed. A malformed blob is a storage fault: logged, never
/// propagated.
pub(crate) fn read_json<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = kv.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Malformed blob, using default");
            None
        }
    }
}

/// Serialize and write a JSON blob. Serialization of our own types does not
/// fail in practice; if it ever does, the write is skipped and logged.
pub(crate) fn write_json<T: Serialize>(kv: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => kv.set(key, &raw),
        Err(e) => warn!(key, error = %e, "Failed to serialize blob, write skipped"),
    }
}
