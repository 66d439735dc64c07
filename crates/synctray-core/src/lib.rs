#![deny(unsafe_code)]

//! synctray core runtime.
//!
//! Holds the Syncthing REST client and the single-consumer dispatch loop that
//! turns menu clicks into daemon calls. Frontends (terminal UI, native tray)
//! only raise [`ActionEvent`]s and render what the loop reports back through
//! the [`Frontend`] trait.

/// Syncthing REST API client and response types.
pub mod api;
/// Action queue and the dispatch loop that owns the API client.
pub mod dispatch;
/// In-memory activity log for the terminal UI.
pub mod logging;
/// Menu model shared by all frontends.
pub mod menu;
/// Channel-backed [`Frontend`] for UIs that own the main thread.
pub mod tray;

pub use api::{ApiClient, ClientError, HttpError, VersionInfo};
pub use dispatch::{
    ActionEvent, ActionReceiver, ActionSender, DispatchError, EventLoop, Frontend, LoopState,
    SystemOpener, UrlOpener, action_channel,
};
pub use logging::{ActivityLog, ActivityReader};
pub use menu::{MenuItem, MenuState};
pub use tray::{ChannelFrontend, TrayUpdate, frontend_channel};
