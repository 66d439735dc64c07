//! Channel-backed frontend.
//!
//! The dispatch loop runs on a tokio task, while UI toolkits want to own the
//! main thread. [`ChannelFrontend`] bridges the two: it implements
//! [`Frontend`] by forwarding [`TrayUpdate`]s over a std channel that the UI
//! drains on its own schedule.

use std::sync::mpsc;

use tracing::debug;

use crate::dispatch::Frontend;
use crate::menu::MenuState;

/// Updates sent from the dispatch loop to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayUpdate {
    /// Replace the version line.
    VersionLabel(String),
    /// Show an error dialog.
    Alert(String),
    /// Tear the UI down.
    Quit,
}

impl TrayUpdate {
    /// Fold the update into a menu state. Returns `false` for `Quit`.
    pub fn apply(&self, state: &mut MenuState) -> bool {
        match self {
            TrayUpdate::VersionLabel(label) => {
                state.version_label = label.clone();
                true
            }
            TrayUpdate::Alert(_) => true,
            TrayUpdate::Quit => false,
        }
    }
}

/// [`Frontend`] that forwards every call as a [`TrayUpdate`].
#[derive(Debug, Clone)]
pub struct ChannelFrontend {
    updates: mpsc::Sender<TrayUpdate>,
}

impl ChannelFrontend {
    fn send(&self, update: TrayUpdate) {
        // The UI may already be gone during shutdown.
        if self.updates.send(update).is_err() {
            debug!("tray update dropped, receiver closed");
        }
    }
}

impl Frontend for ChannelFrontend {
    fn set_version_label(&mut self, label: &str) {
        self.send(TrayUpdate::VersionLabel(label.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.send(TrayUpdate::Alert(message.to_string()));
    }

    fn quit(&mut self) {
        self.send(TrayUpdate::Quit);
    }
}

/// Create a frontend and the receiver the UI thread drains.
pub fn frontend_channel() -> (ChannelFrontend, mpsc::Receiver<TrayUpdate>) {
    let (updates, rx) = mpsc::channel();
    (ChannelFrontend { updates }, rx)
}
