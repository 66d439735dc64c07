//! Typed response bodies of the Syncthing REST API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product name used in human-readable labels.
pub const DAEMON_NAME: &str = "Syncthing";

/// `GET /rest/system/version` response.
///
/// `version`, `os` and `arch` are required; a body missing any of them is a
/// decode error. `longVersion` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub arch: String,
    #[serde(default)]
    pub long_version: String,
    pub os: String,
    pub version: String,
}

impl VersionInfo {
    /// Label shown in the tray, e.g. `Syncthing v1.27.2 (linux/amd64)`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DAEMON_NAME} {} ({}/{})", self.version, self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_format() {
        let info = VersionInfo {
            arch: "amd64".to_string(),
            long_version: String::new(),
            os: "windows".to_string(),
            version: "1.18.0".to_string(),
        };
        assert_eq!(info.label(), "Syncthing 1.18.0 (windows/amd64)");
    }

    #[test]
    fn test_decode_daemon_payload() {
        let body = r#"{
            "arch": "arm64",
            "codename": "Fermium Flea",
            "isBeta": false,
            "isCandidate": false,
            "isRelease": true,
            "longVersion": "syncthing v1.27.2 \"Gold Grasshopper\" (go1.21.5 darwin-arm64)",
            "os": "darwin",
            "version": "v1.27.2"
        }"#;
        let info: VersionInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.version, "v1.27.2");
        assert_eq!(info.os, "darwin");
        assert_eq!(info.arch, "arm64");
        assert!(info.long_version.starts_with("syncthing v1.27.2"));
    }

    #[test]
    fn test_long_version_is_optional() {
        let info: VersionInfo =
            serde_json::from_str(r#"{"arch":"amd64","os":"linux","version":"v1.0.0"}"#).unwrap();
        assert!(info.long_version.is_empty());
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let result = serde_json::from_str::<VersionInfo>(r#"{"arch":"amd64","os":"linux"}"#);
        assert!(result.is_err());
    }
}
