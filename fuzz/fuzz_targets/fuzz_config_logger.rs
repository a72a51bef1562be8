//! Fuzz target for logger configuration parsing.
//!
//! JSON and TOML parsing plus validation must return errors, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sl_common::LoggerConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = LoggerConfig::from_json_str(text) {
        let _ = config.validate();
    }
    if let Ok(config) = LoggerConfig::from_toml_str(text) {
        let _ = config.validate();
    }
});
