//! Application settings and persisted UI state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-wide settings singleton.
///
/// Loaded once at startup and persisted on every update. The OpenRouter key
/// is the caller-supplied credential for chat completions; an empty key is a
/// distinct, user-visible error condition at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub open_router_key: String,
    #[serde(default = "default_model")]
    pub selected_model: String,
}

fn default_model() -> String {
    "openai/gpt-5.2".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            open_router_key: String::new(),
            selected_model: default_model(),
        }
    }
}

/// Persisted presentation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub collapsed_page_ids: HashSet<Uuid>,
    #[serde(default = "default_sidebar_open")]
    pub sidebar_open: bool,
}

fn default_sidebar_open() -> bool {
    true
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            collapsed_page_ids: HashSet::new(),
            sidebar_open: true,
        }
    }
}

impl UiState {
    /// Flip the collapsed state of a page in the tree view.
    pub fn toggle_collapsed(&mut self, page_id: Uuid) {
        if !self.collapsed_page_ids.insert(page_id) {
            self.collapsed_page_ids.remove(&page_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = AppSettings::default();
        assert!(settings.open_router_key.is_empty());
        assert_eq!(settings.selected_model, "openai/gpt-5.2");
    }

    #[test]
    fn test_settings_tolerates_missing_fields() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_toggle_collapsed() {
        let mut ui = UiState::default();
        let id = Uuid::new_v4();

        ui.toggle_collapsed(id);
        assert!(ui.collapsed_page_ids.contains(&id));

        ui.toggle_collapsed(id);
        assert!(!ui.collapsed_page_ids.contains(&id));
    }
}
