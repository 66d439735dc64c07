//! Companion settings.
//!
//! An optional TOML file tweaking how synctray itself behaves. Every field has
//! a default, so an empty (or absent) file is valid.
//!
//! ```toml
//! [daemon]
//! config_path = "/srv/syncthing/config.xml"
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;
use crate::daemon::ConfigResolver;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Top-level companion settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Where to find the daemon.
    #[serde(default)]
    pub daemon: DaemonSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Daemon lookup settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct DaemonSettings {
    /// Explicit path to the daemon's `config.xml`. When unset the daemon's
    /// default per-user location is used.
    #[serde(default)]
    pub config_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse settings from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }
        if let Some(path) = &self.daemon.config_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "daemon.config_path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the daemon config resolver these settings describe.
    pub fn resolver(&self) -> ConfigResolver {
        match &self.daemon.config_path {
            Some(path) => ConfigResolver::with_config_file(path),
            None => ConfigResolver::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.logging.level, "info");
        assert!(settings.daemon.config_path.is_none());
        assert_eq!(settings.resolver(), ConfigResolver::new());
    }

    #[test]
    fn test_parse_empty_toml() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [daemon]
            config_path = "/srv/syncthing/config.xml"

            [logging]
            level = "debug"
        "#;
        let settings = Settings::parse(toml).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(
            settings.resolver(),
            ConfigResolver::with_config_file("/srv/syncthing/config.xml")
        );
    }

    #[test]
    fn test_validation_rejects_unknown_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        let err = Settings::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validation_rejects_empty_config_path() {
        let toml = r#"
            [daemon]
            config_path = ""
        "#;
        assert!(Settings::parse(toml).is_err());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = Settings::parse("not valid toml [[[").unwrap_err();
        assert!(matches!(err, ConfigError::SettingsParse(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("synctray.toml");
        tokio::fs::write(&path, b"[logging]\nlevel = \"trace\"\n")
            .await
            .unwrap();

        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.logging.level, "trace");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = Settings::load(Path::new("/nonexistent/synctray.toml")).await;
        assert!(matches!(result, Err(ConfigError::SettingsIo(_))));
    }
}
