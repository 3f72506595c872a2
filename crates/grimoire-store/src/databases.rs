//! The structured-database map: id → table-like record.
//!
//! Databases have their own id space and are referenced from page content by
//! id; nothing here ties their lifecycle to pages. Persistence is
//! whole-map write-through — adequate while database counts stay small, and
//! isolated in one private method so a per-key scheme could replace it
//! without touching call sites.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use grimoire_core::{Database, DatabasePatch};
use grimoire_kv::{keys, KeyValueStore};

use crate::{read_json, write_json};

/// Owner of all embedded structured databases.
pub struct DatabaseStore {
    kv: Arc<dyn KeyValueStore>,
    databases: HashMap<Uuid, Database>,
}

impl DatabaseStore {
    /// Load the map from the durable store; absent or malformed blobs load
    /// as an empty map.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let databases = read_json(kv.as_ref(), keys::DATABASES).unwrap_or_default();
        Self { kv, databases }
    }

    /// Look up a database.
    pub fn get(&self, id: Uuid) -> Option<&Database> {
        self.databases.get(&id)
    }

    /// All databases, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }

    /// Create a database with the default starter schema.
    pub fn create(&mut self, title: impl Into<String>) -> Database {
        let database = Database::new(title);
        self.databases.insert(database.id, database.clone());
        self.persist();
        database
    }

    /// Shallow-merge a partial update. Unknown ids are a silent no-op.
    pub fn update(&mut self, id: Uuid, patch: DatabasePatch) {
        let Some(database) = self.databases.get_mut(&id) else {
            return;
        };
        patch.apply(database);
        self.persist();
    }

    fn persist(&self) {
        write_json(self.kv.as_ref(), keys::DATABASES, &self.databases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_core::DatabaseView;
    use grimoire_kv::MemoryKv;

    fn store() -> (MemoryKv, DatabaseStore) {
        let kv = MemoryKv::new();
        let store = DatabaseStore::load(Arc::new(kv.clone()));
        (kv, store)
    }

    #[test]
    fn test_create_and_get() {
        let (_, mut store) = store();
        let db = store.create("Tasks");

        let fetched = store.get(db.id).unwrap();
        assert_eq!(fetched, &db);
        assert_eq!(fetched.columns.len(), 2);
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let (_, store) = store();
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_view_update_preserves_everything_else() {
        let (_, mut store) = store();
        let db = store.create("Tasks");

        store.update(db.id, DatabasePatch::view(DatabaseView::Kanban));

        let updated = store.get(db.id).unwrap();
        assert_eq!(updated.current_view, DatabaseView::Kanban);
        assert_eq!(updated.title, db.title);
        assert_eq!(updated.columns, db.columns);
        assert_eq!(updated.rows, db.rows);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (kv, mut store) = store();
        store.update(Uuid::new_v4(), DatabasePatch::view(DatabaseView::Gallery));
        // Nothing was created, nothing was persisted.
        assert!(kv.get(keys::DATABASES).is_none());
    }

    #[test]
    fn test_survives_reload() {
        let (kv, mut store) = store();
        let db = store.create("Tasks");

        let reloaded = DatabaseStore::load(Arc::new(kv));
        assert_eq!(reloaded.get(db.id), Some(&db));
    }

    #[test]
    fn test_malformed_blob_loads_empty() {
        let kv = MemoryKv::new();
        kv.set(keys::DATABASES, "{not json");

        let store = DatabaseStore::load(Arc::new(kv));
        assert_eq!(store.iter().count(), 0);
    }
}
