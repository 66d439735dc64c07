//! Temporary daemon data directories.
//!
//! A [`TestDataDir`] lays out `<tmp>/Syncthing/config.xml` the way the daemon
//! does under the per-user data directory, so tests exercise the real lookup
//! path through [`ConfigResolver::with_data_dir`].

use std::path::{Path, PathBuf};

use synctray_config::ConfigResolver;
use synctray_config::daemon::{DAEMON_CONFIG_FILE, DAEMON_DIR_NAME};
use tempfile::TempDir;

use crate::config::DaemonConfigXml;
use crate::mock_daemon::MockDaemon;

/// A temp data directory holding a daemon config.
///
/// Deleted when dropped, even on panic.
pub struct TestDataDir {
    config_path: PathBuf,
    temp_dir: TempDir,
}

impl TestDataDir {
    /// Write `xml` as the daemon config.
    pub async fn with_xml(xml: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let daemon_dir = temp_dir.path().join(DAEMON_DIR_NAME);
        tokio::fs::create_dir_all(&daemon_dir)
            .await
            .expect("failed to create daemon dir");

        let config_path = daemon_dir.join(DAEMON_CONFIG_FILE);
        tokio::fs::write(&config_path, xml)
            .await
            .expect("failed to write daemon config");

        Self {
            config_path,
            temp_dir,
        }
    }

    /// A config pointing at a running [`MockDaemon`] with its accepted key.
    pub async fn for_daemon(daemon: &MockDaemon) -> Self {
        Self::with_xml(&DaemonConfigXml::new().address(&daemon.address()).build()).await
    }

    /// The data directory root (the parent of `Syncthing/`).
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::with_data_dir(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_daemon::TEST_API_KEY;

    #[tokio::test]
    async fn test_resolver_finds_written_config() {
        let dir = TestDataDir::with_xml(&DaemonConfigXml::new().address("127.0.0.1:1").build()).await;
        assert_eq!(dir.resolver().config_path().unwrap(), dir.config_path());

        let endpoint = dir.resolver().resolve().await.unwrap();
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:1");
        assert_eq!(endpoint.api_key().expose(), TEST_API_KEY);
    }

    #[tokio::test]
    async fn test_for_daemon_matches_mock_endpoint() {
        let daemon = MockDaemon::start().await;
        let dir = TestDataDir::for_daemon(&daemon).await;
        let endpoint = dir.resolver().resolve().await.unwrap();
        assert_eq!(endpoint.base_url(), daemon.base_url());
    }
}
