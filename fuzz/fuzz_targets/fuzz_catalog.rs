//! Fuzz target for catalog JSON parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mcc_compat::Catalog;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Catalog>(data);
});
