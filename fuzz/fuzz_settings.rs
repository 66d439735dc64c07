//! Fuzz target for the companion settings parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_settings

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = synctray_config::Settings::parse(s);
    }
});
