//! Tray menu model.
//!
//! Frontends render the same list of entries: a disabled version line, a
//! separator, the three daemon actions, another separator, then Quit.

use crate::dispatch::ActionEvent;

/// Version line shown until the daemon reports its version.
pub const LOADING_LABEL: &str = "Loading...";

/// Clickable entries in menu order, with their keyboard shortcuts.
pub const ACTIONS: [(ActionEvent, &str, char); 4] = [
    (ActionEvent::OpenUi, "Open web interface", 'o'),
    (ActionEvent::Restart, "Restart", 'r'),
    (ActionEvent::Shutdown, "Shutdown", 's'),
    (ActionEvent::Quit, "Quit", 'q'),
];

/// A single menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display text. Empty for separators.
    pub label: String,
    pub enabled: bool,
    pub action: Option<ActionEvent>,
}

impl MenuItem {
    fn info(label: &str) -> Self {
        Self {
            label: label.to_string(),
            enabled: false,
            action: None,
        }
    }

    fn separator() -> Self {
        Self::info("")
    }

    fn action(action: ActionEvent) -> Self {
        Self {
            label: label_for(action).to_string(),
            enabled: true,
            action: Some(action),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.label.is_empty() && self.action.is_none()
    }
}

/// What the menu currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub version_label: String,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            version_label: LOADING_LABEL.to_string(),
        }
    }
}

impl MenuState {
    pub fn build_menu(&self) -> Vec<MenuItem> {
        vec![
            MenuItem::info(&self.version_label),
            MenuItem::separator(),
            MenuItem::action(ActionEvent::OpenUi),
            MenuItem::action(ActionEvent::Restart),
            MenuItem::action(ActionEvent::Shutdown),
            MenuItem::separator(),
            MenuItem::action(ActionEvent::Quit),
        ]
    }
}

/// Menu label of an action.
pub fn label_for(action: ActionEvent) -> &'static str {
    ACTIONS
        .iter()
        .find(|(a, _, _)| *a == action)
        .map(|(_, label, _)| *label)
        .unwrap_or_default()
}

/// Action bound to a shortcut key, case-insensitive.
pub fn action_for_key(key: char) -> Option<ActionEvent> {
    let key = key.to_ascii_lowercase();
    ACTIONS
        .iter()
        .find(|(_, _, k)| *k == key)
        .map(|(action, _, _)| *action)
}
