//! Keybindings for the terminal frontend.
//!
//! Menu shortcuts (`o`, `r`, `s`, `q`) dispatch straight to the daemon loop.
//! Vim-style keys move the selection and scroll the activity log, with `gg`
//! as the only two-key sequence.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use synctray_core::ActionEvent;
use synctray_core::menu::action_for_key;

/// Something the terminal UI can do in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send a menu action to the dispatch loop.
    Dispatch(ActionEvent),
    SelectNext,
    SelectPrev,
    /// Trigger the selected menu entry, or dismiss an open alert.
    Activate,
    /// Dismiss the open alert.
    Dismiss,
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    None,
}

/// Key mapper with support for the `gg` sequence.
pub struct KeyMapper {
    pending: Option<KeyCode>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Resolve a key press. Ctrl-C always quits.
    pub fn resolve(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.pending = None;
            return match key.code {
                KeyCode::Char('c') => Action::Dispatch(ActionEvent::Quit),
                _ => Action::None,
            };
        }

        if let Some(prev) = self.pending.take() {
            return self.resolve_sequence(prev, key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
            KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
            KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
            KeyCode::Esc => Action::Dismiss,

            KeyCode::PageUp => Action::ScrollUp,
            KeyCode::PageDown => Action::ScrollDown,
            KeyCode::Char('G') => Action::ScrollToBottom,
            KeyCode::Char('g') => {
                self.pending = Some(key.code);
                Action::None
            }

            KeyCode::Char(c) => action_for_key(c).map_or(Action::None, Action::Dispatch),
            _ => Action::None,
        }
    }

    fn resolve_sequence(&mut self, first: KeyCode, second: KeyEvent) -> Action {
        match (first, second.code) {
            (KeyCode::Char('g'), KeyCode::Char('g')) => Action::ScrollToTop,
            _ => self.resolve(second),
        }
    }
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new()
    }
}
