#![deny(unsafe_code)]

//! Shared test utilities for the synctray workspace.
//!
//! A mock Syncthing REST daemon, daemon config fixtures, and a tracing
//! helper, so the crates' tests stay short and consistent.
//!
//! ```toml
//! [dev-dependencies]
//! synctray-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod data_dir;
pub mod mock_daemon;
pub mod tracing_setup;
