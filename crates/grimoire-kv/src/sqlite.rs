//! SQLite-backed key-value store.
//!
//! Uses a simple `Arc<Mutex<Connection>>` pattern; for a single-table store
//! with one writer a pool would be overkill.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{KvError, KvResult};
use crate::KeyValueStore;

/// Schema version - increment when making schema changes.
const SCHEMA_VERSION: i32 = 1;

/// Thread-safe SQLite key-value store.
#[derive(Clone)]
pub struct SqliteKv {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
    /// Open (or create) a store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the database cannot be opened or the schema
    /// cannot be applied. Once constructed, the store's operations degrade
    /// silently instead of erroring.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        info!(path = ?path, "Opening key-value store");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KvError::Connection(format!("Failed to create directory: {e}")))?;
        }

        let conn = Connection::open(&path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory store for testing.
    pub fn memory() -> KvResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> KvResult<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;

        let current: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);
        debug!(current, target = SCHEMA_VERSION, "Checking kv schema");

        if current < SCHEMA_VERSION {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| KvError::Schema(e.to_string()))?;
            conn.execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
            info!(version = SCHEMA_VERSION, "Applied kv schema");
        }

        Ok(())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock();
        match conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "kv read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let conn = self.conn.lock();
        if let Err(e) = conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            params![key, value],
        ) {
            warn!(key, error = %e, "kv write failed");
        }
    }

    fn remove(&self, key: &str) {
        let conn = self.conn.lock();
        if let Err(e) = conn.execute("DELETE FROM kv WHERE key = ?1", params![key]) {
            warn!(key, error = %e, "kv delete failed");
        }
    }

    fn list_keys(&self, prefix: &str) -> Vec<String> {
        let conn = self.conn.lock();
        let mut keys = Vec::new();
        // LIKE with an escaped pattern would also work; a range scan on the
        // primary key avoids wildcard escaping entirely.
        let upper = format!("{prefix}\u{10FFFF}");
        let result = conn
            .prepare("SELECT key FROM kv WHERE key >= ?1 AND key < ?2 ORDER BY key")
            .and_then(|mut stmt| {
                let rows = stmt.query_map(params![prefix, upper], |row| row.get::<_, String>(0))?;
                for row in rows {
                    keys.push(row?);
                }
                Ok(())
            });
        if let Err(e) = result {
            warn!(prefix, error = %e, "kv key listing failed");
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let kv = SqliteKv::memory().unwrap();

        assert_eq!(kv.get("a"), None);
        kv.set("a", "1");
        assert_eq!(kv.get("a"), Some("1".to_string()));

        kv.set("a", "2");
        assert_eq!(kv.get("a"), Some("2".to_string()));

        kv.remove("a");
        assert_eq!(kv.get("a"), None);

        // Removing an absent key is a no-op.
        kv.remove("a");
    }

    #[test]
    fn test_list_keys_respects_prefix() {
        let kv = SqliteKv::memory().unwrap();
        kv.set("pages_a", "1");
        kv.set("pages_b", "2");
        kv.set("chats_a", "3");

        let mut keys = kv.list_keys("pages_");
        keys.sort();
        assert_eq!(keys, vec!["pages_a".to_string(), "pages_b".to_string()]);
        assert!(kv.list_keys("nothing_").is_empty());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let kv = SqliteKv::open(&path).unwrap();
            kv.set("k", "persisted");
        }

        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("k"), Some("persisted".to_string()));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("kv.db");

        let kv = SqliteKv::open(&path).unwrap();
        kv.set("k", "v");
        assert_eq!(kv.get("k"), Some("v".to_string()));
    }
}
