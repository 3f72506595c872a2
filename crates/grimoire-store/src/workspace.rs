//! The composition root: every store plus the operations that span them.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use grimoire_core::{
    AppSettings, ChatSession, Database, DatabasePatch, PageMetadata, PagePatch, UiState,
};
use grimoire_kv::{keys, KeyValueStore};

use crate::{
    read_json, ChatStore, ContentCache, DatabaseStore, PageStore, SettingsStore, UiStateStore,
};

const WELCOME_TITLE: &str = "Welcome";
const WELCOME_ICON: &str = "🏠";
const WELCOME_CONTENT: &str = "<p>Welcome to your new knowledge base! Start typing here...</p>";

/// A fully-loaded knowledge base over one durable store.
///
/// Owns the page tree, content cache, database map, chat histories, and the
/// settings/UI singletons, and enforces the cross-store invariants: deleting
/// a page removes its content and chat history, content writes bump the
/// page's `updated_at`, and the active selection always refers to a live
/// page or nothing.
pub struct Workspace {
    pages: PageStore,
    content: ContentCache,
    databases: DatabaseStore,
    chats: ChatStore,
    settings: SettingsStore,
    ui: UiStateStore,
    active_page_id: Option<Uuid>,
}

impl Workspace {
    /// Load every store from `kv`.
    ///
    /// If no page set exists in durable storage (or its blob is unreadable),
    /// a single welcome page is seeded with placeholder content — the only
    /// implicit side effect permitted at initialization.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let stored_pages: Option<Vec<PageMetadata>> = read_json(kv.as_ref(), keys::PAGES);
        let needs_seed = stored_pages.is_none();

        let mut workspace = Self {
            pages: PageStore::new(kv.clone(), stored_pages.unwrap_or_default()),
            content: ContentCache::new(kv.clone()),
            databases: DatabaseStore::load(kv.clone()),
            chats: ChatStore::load(kv.clone()),
            settings: SettingsStore::load(kv.clone()),
            ui: UiStateStore::load(kv.clone()),
            active_page_id: None,
        };

        if needs_seed {
            info!("No page set found, seeding welcome page");
            let page = workspace.create_page(WELCOME_TITLE, None, WELCOME_ICON);
            workspace.set_page_content(page.id, WELCOME_CONTENT);
        } else {
            workspace.active_page_id = workspace.pages.pages().first().map(|p| p.id);
        }

        workspace
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Read access to the page tree.
    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    /// Create a page, give it an empty content entry, and make it the
    /// active selection.
    pub fn create_page(
        &mut self,
        title: impl Into<String>,
        parent_id: Option<Uuid>,
        icon: impl Into<String>,
    ) -> PageMetadata {
        let page = self.pages.create(title, parent_id, icon);
        self.content.set(page.id, grimoire_core::EMPTY_DOCUMENT);
        self.active_page_id = Some(page.id);
        page
    }

    /// Partial metadata update; unknown ids are a no-op.
    pub fn update_page(&mut self, id: Uuid, patch: PagePatch) {
        self.pages.update(id, patch);
    }

    /// Reparent/reorder the listed pages under `parent_id`.
    pub fn reorder_pages(&mut self, parent_id: Option<Uuid>, ordered_ids: &[Uuid]) {
        self.pages.reorder(parent_id, ordered_ids);
    }

    /// Delete a page and cascade to its content entry and chat history.
    ///
    /// If the deleted page was active, the selection falls back to the
    /// first remaining root page, or to nothing.
    pub fn delete_page(&mut self, id: Uuid) {
        if !self.pages.remove(id) {
            return;
        }
        self.content.remove(id);
        self.chats.remove(id);

        if self.active_page_id == Some(id) {
            self.active_page_id = self.pages.first_root();
        }
    }

    /// Currently selected page, if any.
    pub fn active_page_id(&self) -> Option<Uuid> {
        self.active_page_id
    }

    /// Change the active selection.
    pub fn set_active_page(&mut self, id: Uuid) {
        self.active_page_id = Some(id);
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// A page's rich content (empty document if none was ever stored).
    pub fn page_content(&mut self, id: Uuid) -> String {
        self.content.get(id)
    }

    /// Write-through content update; also refreshes the owning page's
    /// `updated_at`.
    pub fn set_page_content(&mut self, id: Uuid, content: impl Into<String>) {
        self.content.set(id, content);
        self.pages.touch(id);
    }

    // ------------------------------------------------------------------
    // Structured databases
    // ------------------------------------------------------------------

    /// Read access to the database map.
    pub fn databases(&self) -> &DatabaseStore {
        &self.databases
    }

    /// Create a database with the starter schema.
    pub fn create_database(&mut self, title: impl Into<String>) -> Database {
        self.databases.create(title)
    }

    /// Shallow-merge a database update; unknown ids are a no-op.
    pub fn update_database(&mut self, id: Uuid, patch: DatabasePatch) {
        self.databases.update(id, patch);
    }

    // ------------------------------------------------------------------
    // Chat history
    // ------------------------------------------------------------------

    /// A page's chat sessions (empty if none).
    pub fn chat_sessions(&self, page_id: Uuid) -> &[ChatSession] {
        self.chats.sessions(page_id)
    }

    /// Replace a page's whole chat session list.
    pub fn save_chat_sessions(&mut self, page_id: Uuid, sessions: Vec<ChatSession>) {
        self.chats.save(page_id, sessions);
    }

    // ------------------------------------------------------------------
    // Settings and UI state
    // ------------------------------------------------------------------

    /// Current application settings.
    pub fn settings(&self) -> &AppSettings {
        self.settings.get()
    }

    /// Mutate and persist settings.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut AppSettings)) {
        self.settings.update(f);
    }

    /// Current UI state.
    pub fn ui_state(&self) -> &UiState {
        self.ui.get()
    }

    /// Flip a page's collapsed state in the tree view.
    pub fn toggle_collapsed(&mut self, page_id: Uuid) {
        self.ui.toggle_collapsed(page_id);
    }

    /// Show or hide the sidebar.
    pub fn set_sidebar_open(&mut self, open: bool) {
        self.ui.set_sidebar_open(open);
    }
}
