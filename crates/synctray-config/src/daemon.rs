//! Syncthing daemon config discovery.
//!
//! The daemon keeps its settings in `<data-local-dir>/Syncthing/config.xml`:
//!
//! ```xml
//! <configuration version="37">
//!     <gui enabled="true" tls="false">
//!         <address>127.0.0.1:8384</address>
//!         <apikey>k3yk3yk3y</apikey>
//!     </gui>
//!     ...
//! </configuration>
//! ```
//!
//! Only the `gui/address` and `gui/apikey` elements are read. Everything else
//! in the document is ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ConfigError;

/// Subdirectory of the per-user data directory holding the daemon's files.
pub const DAEMON_DIR_NAME: &str = "Syncthing";

/// File name of the daemon's configuration document.
pub const DAEMON_CONFIG_FILE: &str = "config.xml";

/// Scheme prefixed to the GUI address to form the base URL.
pub const DEFAULT_SCHEME: &str = "http://";

const ROOT_ELEMENT: &str = "configuration";

/// The daemon's REST API key. Zeroized on drop and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key. Only the HTTP layer should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Resolved address of the daemon's REST API and the key that authenticates
/// against it. Fields are private so the pair cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonEndpoint {
    base_url: String,
    api_key: ApiKey,
}

impl DaemonEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Derive the endpoint from a parsed daemon config by prefixing the GUI
    /// address with [`DEFAULT_SCHEME`].
    pub fn from_config(config: &DaemonConfig) -> Self {
        Self::new(
            format!("{DEFAULT_SCHEME}{}", config.gui_address),
            config.api_key.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

/// Why a daemon config document was rejected.
#[derive(Debug, thiserror::Error)]
pub enum MalformedConfig {
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("invalid XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid document structure: {0}")]
    Structure(#[from] quick_xml::DeError),

    #[error("expected root element <configuration>, found <{0}>")]
    WrongRoot(String),

    #[error("document has no root element")]
    Empty,

    #[error("missing <gui> element")]
    MissingGui,

    #[error("missing or empty <gui>/<{0}> element")]
    MissingField(&'static str),
}

/// The two values synctray needs from the daemon's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// GUI listen address as `host:port`.
    pub gui_address: String,
    /// REST API key.
    pub api_key: ApiKey,
}

#[derive(Deserialize)]
struct ConfigDocument {
    gui: Option<GuiElement>,
}

#[derive(Deserialize)]
struct GuiElement {
    address: Option<String>,
    apikey: Option<String>,
}

impl DaemonConfig {
    /// Parse a `config.xml` document.
    ///
    /// Both `gui/address` and `gui/apikey` are required and must be
    /// non-blank; a document lacking either is rejected rather than yielding
    /// an empty value.
    pub fn from_xml(xml: &str) -> Result<Self, MalformedConfig> {
        match root_element(xml)? {
            Some(name) if name == ROOT_ELEMENT => {}
            Some(name) => return Err(MalformedConfig::WrongRoot(name)),
            None => return Err(MalformedConfig::Empty),
        }

        let doc: ConfigDocument = quick_xml::de::from_str(xml)?;
        let gui = doc.gui.ok_or(MalformedConfig::MissingGui)?;

        Ok(Self {
            gui_address: required(gui.address, "address")?,
            api_key: ApiKey::new(required(gui.apikey, "apikey")?),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, MalformedConfig> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(MalformedConfig::MissingField(field)),
    }
}

/// Local name of the first element in the document, if any.
fn root_element(xml: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                return Ok(Some(name));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    /// `dirs::data_local_dir()/Syncthing/config.xml`
    DefaultLocation,
    /// `<dir>/Syncthing/config.xml`
    DataDir(PathBuf),
    /// An explicit config file.
    File(PathBuf),
}

/// Locates and parses the daemon's config to produce a [`DaemonEndpoint`].
///
/// Performs exactly one file lookup and no network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResolver {
    source: ConfigSource,
}

impl ConfigResolver {
    /// Resolver for the daemon's default per-user location.
    pub fn new() -> Self {
        Self {
            source: ConfigSource::DefaultLocation,
        }
    }

    /// Resolver rooted at a specific data directory instead of the
    /// platform default.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: ConfigSource::DataDir(dir.into()),
        }
    }

    /// Resolver for an explicit `config.xml` path.
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ConfigSource::File(path.into()),
        }
    }

    /// The config file this resolver will read.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.source {
            ConfigSource::DefaultLocation => default_config_path(dirs::data_local_dir()),
            ConfigSource::DataDir(dir) => Ok(daemon_config_in(dir)),
            ConfigSource::File(path) => Ok(path.clone()),
        }
    }

    /// Read and parse the daemon config.
    pub async fn load(&self) -> Result<DaemonConfig, ConfigError> {
        let path = self.config_path()?;
        debug!(path = %path.display(), "reading daemon config");

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound { path });
            }
            Err(source) => return Err(ConfigError::Unreadable { path, source }),
        };

        String::from_utf8(bytes)
            .map_err(MalformedConfig::from)
            .and_then(|content| DaemonConfig::from_xml(&content))
            .map_err(|source| ConfigError::Malformed { path, source })
    }

    /// Read the daemon config and derive the endpoint from it.
    pub async fn resolve(&self) -> Result<DaemonEndpoint, ConfigError> {
        let config = self.load().await?;
        let endpoint = DaemonEndpoint::from_config(&config);
        debug!(base_url = endpoint.base_url(), "resolved daemon endpoint");
        Ok(endpoint)
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_path(data_local_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    data_local_dir
        .map(|dir| daemon_config_in(&dir))
        .ok_or(ConfigError::EnvironmentMissing)
}

fn daemon_config_in(dir: &Path) -> PathBuf {
    dir.join(DAEMON_DIR_NAME).join(DAEMON_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const VALID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<configuration version="37">
    <folder id="default" label="Default Folder" path="/home/user/Sync" type="sendreceive">
        <device id="AAAA-BBBB"></device>
    </folder>
    <gui enabled="true" tls="false" debugging="false">
        <address>127.0.0.1:8384</address>
        <apikey>abc123</apikey>
        <theme>default</theme>
    </gui>
    <options>
        <listenAddress>default</listenAddress>
    </options>
</configuration>
"#;

    async fn write_daemon_config(dir: &Path, xml: &str) -> PathBuf {
        let sub = dir.join(DAEMON_DIR_NAME);
        tokio::fs::create_dir_all(&sub).await.unwrap();
        let path = sub.join(DAEMON_CONFIG_FILE);
        tokio::fs::write(&path, xml).await.unwrap();
        path
    }

    // ── Parsing ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_real_world_document() {
        let config = DaemonConfig::from_xml(VALID).unwrap();
        assert_eq!(
            config,
            DaemonConfig {
                gui_address: "127.0.0.1:8384".to_string(),
                api_key: ApiKey::new("abc123"),
            }
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let xml = "<configuration><gui><address>\n  localhost:8384 \n</address><apikey> k </apikey></gui></configuration>";
        let config = DaemonConfig::from_xml(xml).unwrap();
        assert_eq!(config.gui_address, "localhost:8384");
        assert_eq!(config.api_key.expose(), "k");
    }

    #[test]
    fn test_missing_apikey_is_rejected() {
        let xml = "<configuration><gui><address>127.0.0.1:8384</address></gui></configuration>";
        let err = DaemonConfig::from_xml(xml).unwrap_err();
        assert!(matches!(err, MalformedConfig::MissingField("apikey")));
    }

    #[test]
    fn test_empty_apikey_is_rejected() {
        let xml =
            "<configuration><gui><address>127.0.0.1:8384</address><apikey></apikey></gui></configuration>";
        let err = DaemonConfig::from_xml(xml).unwrap_err();
        assert!(matches!(err, MalformedConfig::MissingField("apikey")));
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let xml = "<configuration><gui><apikey>abc</apikey></gui></configuration>";
        let err = DaemonConfig::from_xml(xml).unwrap_err();
        assert!(matches!(err, MalformedConfig::MissingField("address")));
    }

    #[test]
    fn test_missing_gui_is_rejected() {
        let xml = "<configuration><options></options></configuration>";
        let err = DaemonConfig::from_xml(xml).unwrap_err();
        assert!(matches!(err, MalformedConfig::MissingGui));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let xml = "<settings><gui><address>a:1</address><apikey>k</apikey></gui></settings>";
        let err = DaemonConfig::from_xml(xml).unwrap_err();
        assert!(matches!(err, MalformedConfig::WrongRoot(ref name) if name == "settings"));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(matches!(
            DaemonConfig::from_xml("").unwrap_err(),
            MalformedConfig::Empty
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(DaemonConfig::from_xml("<configuration><gui></configuration>").is_err());
    }

    // ── Endpoint ──────────────────────────────────────────────────────

    #[test]
    fn test_endpoint_prefixes_scheme() {
        let config = DaemonConfig::from_xml(VALID).unwrap();
        let endpoint = DaemonEndpoint::from_config(&config);
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:8384");
        assert_eq!(endpoint.api_key().expose(), "abc123");
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let endpoint = DaemonEndpoint::new("http://x", ApiKey::new("hunter2"));
        let debug = format!("{endpoint:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    // ── Resolver ──────────────────────────────────────────────────────

    #[test]
    fn test_data_dir_path_layout() {
        let resolver = ConfigResolver::with_data_dir("/data");
        assert_eq!(
            resolver.config_path().unwrap(),
            Path::new("/data").join("Syncthing").join("config.xml")
        );
    }

    #[test]
    fn test_default_location_needs_data_dir() {
        assert!(matches!(
            default_config_path(None),
            Err(ConfigError::EnvironmentMissing)
        ));
        assert_eq!(
            default_config_path(Some(PathBuf::from("/home/u/.local/share"))).unwrap(),
            Path::new("/home/u/.local/share")
                .join("Syncthing")
                .join("config.xml")
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_resolve_from_data_dir() {
        let tmp = TempDir::new().unwrap();
        write_daemon_config(tmp.path(), VALID).await;

        let endpoint = ConfigResolver::with_data_dir(tmp.path())
            .resolve()
            .await
            .unwrap();
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:8384");
        assert_eq!(endpoint.api_key(), &ApiKey::new("abc123"));
    }

    #[tokio::test]
    async fn test_resolve_from_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.xml");
        tokio::fs::write(&path, VALID).await.unwrap();

        let endpoint = ConfigResolver::with_config_file(&path)
            .resolve()
            .await
            .unwrap();
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:8384");
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = ConfigResolver::with_data_dir(tmp.path())
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_directory_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        let err = ConfigResolver::with_config_file(tmp.path())
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[tokio::test]
    async fn test_resolve_without_apikey_is_malformed() {
        let tmp = TempDir::new().unwrap();
        write_daemon_config(
            tmp.path(),
            "<configuration><gui><address>127.0.0.1:8384</address></gui></configuration>",
        )
        .await;

        let err = ConfigResolver::with_data_dir(tmp.path())
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Malformed {
                source: MalformedConfig::MissingField("apikey"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_invalid_utf8_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.xml");
        let mut xml = b"<configuration><gui><address>127.0.0.1:8384</address><apikey>".to_vec();
        xml.extend_from_slice(&[0xff, 0xfe]);
        xml.extend_from_slice(b"</apikey></gui></configuration>");
        tokio::fs::write(&path, xml).await.unwrap();

        let err = ConfigResolver::with_config_file(&path)
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Malformed {
                source: MalformedConfig::Encoding(_),
                ..
            }
        ));
    }
}
