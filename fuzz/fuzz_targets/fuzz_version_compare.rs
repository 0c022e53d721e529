//! Fuzz target for accelerator version parsing and comparison.
//!
//! Arbitrary family, required version and available versions must always
//! produce a verdict, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mcc_compat::{AcceleratorCapability, AcceleratorRequirement, CompatibilityValidator, Version};

#[derive(Debug, Arbitrary)]
struct Input {
    family: String,
    provided_family: String,
    required: String,
    available: Vec<String>,
}

fuzz_target!(|input: Input| {
    if let Ok(version) = input.required.parse::<Version>() {
        // Display output must parse back to the same components.
        let reparsed: Version = version.to_string().parse().expect("display output parses");
        assert_eq!(version, reparsed);
    }

    let validator = CompatibilityValidator::with_defaults();
    let requirement = AcceleratorRequirement::new(input.family, input.required);
    let capability = AcceleratorCapability::new(input.provided_family, input.available);
    let result = validator.check_compatibility(&requirement, &capability);
    if !result.compatible {
        assert!(result.error.is_some());
    }
});
