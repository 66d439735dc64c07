//! Daemon `config.xml` builders for tests.
//!
//! Use [`DaemonConfigXml`] to produce realistic daemon config documents
//! without repeating the XML boilerplate in every test.

/// Fluent builder for a daemon `config.xml` document.
///
/// # Example
///
/// ```ignore
/// let xml = DaemonConfigXml::new()
///     .address("127.0.0.1:9090")
///     .api_key("secret")
///     .build();
/// ```
pub struct DaemonConfigXml {
    address: String,
    api_key: Option<String>,
}

impl DaemonConfigXml {
    pub fn new() -> Self {
        Self {
            address: "127.0.0.1:8384".to_string(),
            api_key: Some(crate::mock_daemon::TEST_API_KEY.to_string()),
        }
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Leave out the `<apikey>` element entirely.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn build(self) -> String {
        let api_key = self
            .api_key
            .map(|key| format!("        <apikey>{key}</apikey>\n"))
            .unwrap_or_default();
        format!(
            r#"<configuration version="37">
    <folder id="default" label="Default Folder" path="/home/user/Sync" type="sendreceive"></folder>
    <gui enabled="true" tls="false" debugging="false">
        <address>{address}</address>
{api_key}        <theme>default</theme>
    </gui>
    <options>
        <listenAddress>default</listenAddress>
    </options>
</configuration>
"#,
            address = self.address,
        )
    }
}

impl Default for DaemonConfigXml {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synctray_config::DaemonConfig;

    #[test]
    fn test_built_document_parses() {
        let xml = DaemonConfigXml::new().address("10.0.0.2:8080").api_key("k").build();
        let config = DaemonConfig::from_xml(&xml).unwrap();
        assert_eq!(config.gui_address, "10.0.0.2:8080");
        assert_eq!(config.api_key.expose(), "k");
    }

    #[test]
    fn test_without_api_key() {
        let xml = DaemonConfigXml::new().without_api_key().build();
        assert!(!xml.contains("<apikey>"));
        assert!(DaemonConfig::from_xml(&xml).is_err());
    }
}
