//! Fuzz target for config parsing.
//!
//! Feeds arbitrary text to both the YAML and JSON config parsers.

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackaug::AugmentConfig;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = AugmentConfig::from_yaml_str(text);
    let _ = AugmentConfig::from_json_str(text);
});
