#![deny(unsafe_code)]

//! Configuration for synctray.
//!
//! Two independent sources are handled here:
//!
//! - the Syncthing daemon's own `config.xml`, read once at startup by
//!   [`ConfigResolver`] to recover the GUI address and API key, and
//! - the companion's optional TOML [`Settings`] file (log level, explicit
//!   daemon config path).
//!
//! Neither is ever written back.

/// Daemon config discovery, parsing, and endpoint derivation.
pub mod daemon;
/// Companion settings loaded from TOML.
pub mod settings;

use std::path::PathBuf;

pub use daemon::{ApiKey, ConfigResolver, DaemonConfig, DaemonEndpoint, MalformedConfig};
pub use settings::Settings;

/// Errors that can occur while locating or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("per-user application data directory is not defined")]
    EnvironmentMissing,

    #[error("daemon config not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read daemon config at {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed daemon config at {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: MalformedConfig,
    },

    #[error("failed to read settings file: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("failed to parse settings TOML: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
