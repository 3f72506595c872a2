//! Settings and UI-state singletons.
//!
//! Both load once at startup and persist on every update. Malformed blobs
//! fall back to defaults.

use std::sync::Arc;

use uuid::Uuid;

use grimoire_core::{AppSettings, UiState};
use grimoire_kv::{keys, KeyValueStore};

use crate::{read_json, write_json};

/// Owner of the process-wide [`AppSettings`].
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    settings: AppSettings,
}

impl SettingsStore {
    /// Load settings, defaulting when absent or malformed.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let settings = read_json(kv.as_ref(), keys::SETTINGS).unwrap_or_default();
        Self { kv, settings }
    }

    /// Current settings.
    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    /// Mutate settings in place and persist the result.
    pub fn update(&mut self, f: impl FnOnce(&mut AppSettings)) {
        f(&mut self.settings);
        write_json(self.kv.as_ref(), keys::SETTINGS, &self.settings);
    }
}

/// Owner of the persisted [`UiState`].
pub struct UiStateStore {
    kv: Arc<dyn KeyValueStore>,
    state: UiState,
}

impl UiStateStore {
    /// Load UI state, defaulting when absent or malformed.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let state = read_json(kv.as_ref(), keys::UI_STATE).unwrap_or_default();
        Self { kv, state }
    }

    /// Current state.
    pub fn get(&self) -> &UiState {
        &self.state
    }

    /// Flip a page's collapsed state in the tree view and persist.
    pub fn toggle_collapsed(&mut self, page_id: Uuid) {
        self.state.toggle_collapsed(page_id);
        self.persist();
    }

    /// Show or hide the sidebar and persist.
    pub fn set_sidebar_open(&mut self, open: bool) {
        self.state.sidebar_open = open;
        self.persist();
    }

    fn persist(&self) {
        write_json(self.kv.as_ref(), keys::UI_STATE, &self.state);
    }
}
