//! Syncthing REST management API.
//!
//! ```text
//! ┌──────────────┐   HTTP/1.1 + X-API-Key    ┌──────────────────┐
//! │  EventLoop   │──────────────────────────▶│  Syncthing GUI   │
//! │  (ApiClient) │   /rest/system/{version,  │  listener        │
//! └──────────────┘    restart,shutdown}      └──────────────────┘
//! ```

pub mod client;
pub mod types;

pub use client::{ApiClient, ClientError, DecodeError, HttpError, REQUEST_TIMEOUT};
pub use types::{DAEMON_NAME, VersionInfo};
