//! Fuzz target for the daemon `config.xml` reader.
//!
//! Run with: cargo +nightly fuzz run fuzz_daemon_config
//!
//! Feeds arbitrary text to `DaemonConfig::from_xml`. Any input must yield
//! either a config with non-blank address and key, or an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use synctray_config::DaemonConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = DaemonConfig::from_xml(s) {
            assert!(!config.gui_address.trim().is_empty());
            assert!(!config.api_key.expose().trim().is_empty());
        }
    }
});
