//! Page metadata: the nodes of the hierarchical content tree.
//!
//! A page's rich-content body is stored separately (keyed by page id); the
//! metadata record carries everything the tree view needs. Sibling display
//! order is defined by sorting `order` — values need not be contiguous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a single page in the tree.
///
/// `parent_id` is `None` for root pages. The tree is acyclic by construction
/// discipline of the mutating operations; no cycle detection is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub id: Uuid,
    pub title: String,
    pub parent_id: Option<Uuid>,
    pub icon: String,
    pub updated_at: DateTime<Utc>,
    pub order: i64,
}

impl PageMetadata {
    /// Create a new page with a fresh id and the current timestamp.
    pub fn new(
        title: impl Into<String>,
        parent_id: Option<Uuid>,
        icon: impl Into<String>,
        order: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            parent_id,
            icon: icon.into(),
            updated_at: Utc::now(),
            order,
        }
    }

    /// Refresh `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update for page metadata.
///
/// Unset fields are left untouched. `parent_id` is doubly optional so that
/// moving a page back to the root (`Some(None)`) is distinguishable from not
/// changing the parent at all (`None`).
#[derive(Debug, Clone, Default)]
pub struct PagePatch {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub order: Option<i64>,
}

impl PagePatch {
    /// Patch that only renames the page.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that only changes the icon.
    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Self::default()
        }
    }

    /// Apply the patch to a page, leaving unset fields alone.
    ///
    /// Does not touch `updated_at`; the store refreshes it on every update.
    pub fn apply(self, page: &mut PageMetadata) {
        if let Some(title) = self.title {
            page.title = title;
        }
        if let Some(icon) = self.icon {
            page.icon = icon;
        }
        if let Some(parent_id) = self.parent_id {
            page.parent_id = parent_id;
        }
        if let Some(order) = self.order {
            page.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_defaults() {
        let page = PageMetadata::new("Inbox", None, "📄", 0);

        assert_eq!(page.title, "Inbox");
        assert!(page.parent_id.is_none());
        assert_eq!(page.icon, "📄");
        assert_eq!(page.order, 0);
    }

    #[test]
    fn test_page_ids_unique() {
        let a = PageMetadata::new("A", None, "", 0);
        let b = PageMetadata::new("B", None, "", 0);

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut page = PageMetadata::new("Old", None, "📄", 3);
        let id = page.id;

        PagePatch::title("New").apply(&mut page);

        assert_eq!(page.title, "New");
        assert_eq!(page.icon, "📄");
        assert_eq!(page.order, 3);
        assert_eq!(page.id, id);
    }

    #[test]
    fn test_patch_can_reroot() {
        let parent = Uuid::new_v4();
        let mut page = PageMetadata::new("Child", Some(parent), "", 0);

        let patch = PagePatch {
            parent_id: Some(None),
            ..PagePatch::default()
        };
        patch.apply(&mut page);

        assert!(page.parent_id.is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let page = PageMetadata::new("Roadmap", None, "🗺️", 2);
        let json = serde_json::to_string(&page).unwrap();
        let back: PageMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(back, page);
    }
}
