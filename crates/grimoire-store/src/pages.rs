//! The page tree: ordered page metadata records and the operations that
//! preserve its invariants.
//!
//! The whole index persists as one JSON blob, rewritten on every mutation.
//! Sibling order is defined by sorting `order`; values need not be
//! contiguous. Deleting a page does not touch its children — orphans keep
//! their dangling `parent_id` (documented limitation).

use std::sync::Arc;

use uuid::Uuid;

use grimoire_core::{PageMetadata, PagePatch};
use grimoire_kv::{keys, KeyValueStore};

use crate::write_json;

/// Owner of the page metadata collection.
pub struct PageStore {
    kv: Arc<dyn KeyValueStore>,
    pages: Vec<PageMetadata>,
}

impl PageStore {
    /// Construct over an already-loaded page set.
    pub fn new(kv: Arc<dyn KeyValueStore>, pages: Vec<PageMetadata>) -> Self {
        Self { kv, pages }
    }

    /// All pages, in insertion order.
    pub fn pages(&self) -> &[PageMetadata] {
        &self.pages
    }

    /// Look up one page.
    pub fn get(&self, id: Uuid) -> Option<&PageMetadata> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Children of `parent_id` (or root pages for `None`), sorted into
    /// display sequence.
    pub fn children(&self, parent_id: Option<Uuid>) -> Vec<&PageMetadata> {
        let mut children: Vec<&PageMetadata> = self
            .pages
            .iter()
            .filter(|p| p.parent_id == parent_id)
            .collect();
        children.sort_by_key(|p| p.order);
        children
    }

    /// First root page in insertion order, if any.
    pub fn first_root(&self) -> Option<Uuid> {
        self.pages.iter().find(|p| p.parent_id.is_none()).map(|p| p.id)
    }

    /// Create a page as the last sibling under `parent_id`.
    ///
    /// The new page's `order` is one past the highest sibling order, or 0
    /// when it has no siblings.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        parent_id: Option<Uuid>,
        icon: impl Into<String>,
    ) -> PageMetadata {
        let next_order = self
            .pages
            .iter()
            .filter(|p| p.parent_id == parent_id)
            .map(|p| p.order)
            .max()
            .map_or(0, |max| max + 1);

        let page = PageMetadata::new(title, parent_id, icon, next_order);
        self.pages.push(page.clone());
        self.persist();
        page
    }

    /// Apply a partial update and refresh `updated_at`. Unknown ids are a
    /// no-op, not an error.
    pub fn update(&mut self, id: Uuid, patch: PagePatch) {
        let Some(page) = self.pages.iter_mut().find(|p| p.id == id) else {
            return;
        };
        patch.apply(page);
        page.touch();
        self.persist();
    }

    /// Refresh a page's `updated_at` (content writes go through here).
    pub fn touch(&mut self, id: Uuid) {
        if let Some(page) = self.pages.iter_mut().find(|p| p.id == id) {
            page.touch();
            self.persist();
        }
    }

    /// Reparent and reorder in one call: every page whose id appears in
    /// `ordered_ids` gets `parent_id` as its parent and its index in the
    /// sequence as its order. Pages not listed are untouched.
    pub fn reorder(&mut self, parent_id: Option<Uuid>, ordered_ids: &[Uuid]) {
        for page in &mut self.pages {
            if let Some(index) = ordered_ids.iter().position(|id| *id == page.id) {
                page.parent_id = parent_id;
                page.order = index as i64;
            }
        }
        self.persist();
    }

    /// Remove a page record. Returns whether it existed. Children are left
    /// in place with their (now dangling) parent reference.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.pages.iter().position(|p| p.id == id) else {
            return false;
        };
        self.pages.remove(index);
        self.persist();
        true
    }

    fn persist(&self) {
        write_json(self.kv.as_ref(), keys::PAGES, &self.pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_kv::MemoryKv;

    fn store() -> PageStore {
        PageStore::new(Arc::new(MemoryKv::new()), Vec::new())
    }

    #[test]
    fn test_create_assigns_sequential_sibling_order() {
        let mut store = store();

        let a = store.create("A", None, "");
        let b = store.create("B", None, "");
        let child = store.create("A.1", Some(a.id), "");

        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);
        // First child under a different parent starts back at zero.
        assert_eq!(child.order, 0);
    }

    #[test]
    fn test_create_order_skips_past_gaps() {
        let mut store = store();
        let a = store.create("A", None, "");
        store.update(
            a.id,
            PagePatch {
                order: Some(10),
                ..PagePatch::default()
            },
        );

        let b = store.create("B", None, "");
        assert_eq!(b.order, 11);
    }

    #[test]
    fn test_ids_unique_across_create_delete_sequences() {
        let mut store = store();
        let a = store.create("A", None, "");
        store.create("B", None, "");
        store.remove(a.id);
        store.create("C", None, "");

        let mut ids: Vec<Uuid> = store.pages().iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.pages().len());
    }

    #[test]
    fn test_update_refreshes_timestamp_and_merges() {
        let mut store = store();
        let page = store.create("Old", None, "📄");
        let before = store.get(page.id).unwrap().updated_at;

        store.update(page.id, PagePatch::title("New"));

        let updated = store.get(page.id).unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.icon, "📄");
        assert!(updated.updated_at >= before);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = store();
        store.create("A", None, "");

        store.update(Uuid::new_v4(), PagePatch::title("ghost"));

        assert_eq!(store.pages().len(), 1);
        assert_eq!(store.pages()[0].title, "A");
    }

    #[test]
    fn test_reorder_sets_parent_and_sequence() {
        let mut store = store();
        let a = store.create("A", None, "");
        let b = store.create("B", None, "");
        let c = store.create("C", None, "");
        let parent = store.create("P", None, "");

        store.reorder(Some(parent.id), &[c.id, a.id]);

        let ordered: Vec<Uuid> = store
            .children(Some(parent.id))
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ordered, vec![c.id, a.id]);

        // Pages not in the sequence keep their prior parent and order.
        let untouched = store.get(b.id).unwrap();
        assert_eq!(untouched.parent_id, None);
        assert_eq!(untouched.order, 1);
    }

    #[test]
    fn test_reorder_supports_pure_reordering() {
        let mut store = store();
        let a = store.create("A", None, "");
        let b = store.create("B", None, "");

        store.reorder(None, &[b.id, a.id]);

        let ordered: Vec<Uuid> = store.children(None).iter().map(|p| p.id).collect();
        assert_eq!(ordered, vec![b.id, a.id]);
    }

    #[test]
    fn test_remove_reports_existence() {
        let mut store = store();
        let a = store.create("A", None, "");

        assert!(store.remove(a.id));
        assert!(!store.remove(a.id));
    }

    #[test]
    fn test_delete_orphans_children_in_place() {
        let mut store = store();
        let parent = store.create("P", None, "");
        let child = store.create("C", Some(parent.id), "");

        store.remove(parent.id);

        // Orphaned child keeps its dangling parent reference.
        assert_eq!(store.get(child.id).unwrap().parent_id, Some(parent.id));
    }
}
