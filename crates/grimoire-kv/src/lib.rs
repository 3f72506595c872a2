//! # Grimoire KV
//!
//! Durable key-value storage for the Grimoire knowledge base.
//!
//! Every persisted domain — the page index, per-page content, per-page chat
//! history, the structured-database map, settings, UI state, and the
//! embedding index — is one string blob under a namespaced key. This crate
//! provides the synchronous [`KeyValueStore`] contract plus two backends:
//!
//! - [`SqliteKv`]: a single-table SQLite store (WAL mode, bundled engine)
//! - [`MemoryKv`]: a hash-map stand-in for tests
//!
//! ## Failure policy
//!
//! Construction can fail ([`KvError`]), but the store operations themselves
//! never do: read/write/remove faults are logged and degrade to `None` or a
//! no-op. Callers must not assume a write succeeded; higher layers treat
//! local persistence as best-effort by design.

pub mod error;
pub mod keys;
pub mod memory;
pub mod sqlite;

pub use error::{KvError, KvResult};
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use std::sync::Arc;

/// Synchronous, namespaced key-value storage.
///
/// All operations are infallible at the call site: backend errors are logged
/// inside the implementation and surface as `None` or a silent no-op, never
/// as a panic or an `Err` past this boundary.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if absent (or unreadable).
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);

    /// All stored keys starting with `prefix`, in unspecified order.
    fn list_keys(&self, prefix: &str) -> Vec<String>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn list_keys(&self, prefix: &str) -> Vec<String> {
        (**self).list_keys(prefix)
    }
}
