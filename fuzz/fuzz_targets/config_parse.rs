//! Fuzz test for configuration file parsing
//!
//! Tests that arbitrary TOML input doesn't cause panics or crashes when
//! parsed and validated as wand configuration.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealwand_crypto::WandConfig;

fuzz_target!(|data: &[u8]| {
    // Try parsing as UTF-8 TOML
    if let Ok(s) = std::str::from_utf8(data) {
        // This will fail for invalid configs, but shouldn't panic
        if let Ok(config) = toml::from_str::<WandConfig>(s) {
            let _ = config.validate();
        }
    }
});
