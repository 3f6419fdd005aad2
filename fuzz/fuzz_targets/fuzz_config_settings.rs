//! Fuzz target for config.toml parsing.
//!
//! Parsing and validation must return an error for malformed input, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;
use txr_config::parse_settings;

fuzz_target!(|data: &str| {
    let _ = parse_settings(data, Path::new("fuzz.toml"));
});
