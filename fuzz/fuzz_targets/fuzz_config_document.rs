//! Fuzz target for JSON, YAML and TOML configuration documents.
//!
//! Parsing must return a document or an error, never panic.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use mcc_config::ConfigDocument;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    for name in ["fuzz.json", "fuzz.yaml", "fuzz.toml"] {
        let _ = ConfigDocument::parse(Path::new(name), content);
    }
});
