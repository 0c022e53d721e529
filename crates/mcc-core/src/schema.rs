//! JSON Schema generation for mcc output types.
//!
//! ```bash
//! mcc schema --list
//! mcc schema GenerateReport
//! mcc schema --all
//! ```

use std::collections::BTreeMap;

use mcc_common::Error;
use schemars::schema_for;
use serde_json::Value;

pub use crate::pipeline::{CompatibilityReport, GenerateReport, ResolveReport};
pub use mcc_compat::{
    AcceleratorCapability, AcceleratorRequirement, Catalog, EnvVarValidation,
    InstanceRecommendation, ValidationResult,
};
pub use mcc_config::{FinalConfiguration, Provenance, ResolutionSnapshot, Violation};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Resolution
        ("FinalConfiguration", "Finalized parameter values with provenance"),
        ("Provenance", "Which source supplied a final value"),
        ("ResolutionSnapshot", "Documents, hashes and winning sources of one run"),
        ("ResolveReport", "Resolved values before prompting and finalization"),
        ("Violation", "Missing or invalid parameter finding"),
        // Compatibility
        ("AcceleratorRequirement", "Accelerator family and minimum version a server needs"),
        ("AcceleratorCapability", "Accelerator family and versions an instance provides"),
        ("ValidationResult", "Outcome of one compatibility check"),
        ("InstanceRecommendation", "Compatible instance type"),
        ("CompatibilityReport", "Server-versus-instance check inside a generate run"),
        ("EnvVarValidation", "Environment-variable findings and strategies used"),
        ("Catalog", "Serving frameworks, instance profiles and community reports"),
        // Pipeline
        ("GenerateReport", "Complete output of mcc generate"),
    ]
}

/// Generate JSON Schema for a type by name. `None` if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Result<Value, Error>> {
    let schema = match type_name {
        "FinalConfiguration" => schema_for!(FinalConfiguration),
        "Provenance" => schema_for!(Provenance),
        "ResolutionSnapshot" => schema_for!(ResolutionSnapshot),
        "ResolveReport" => schema_for!(ResolveReport),
        "Violation" => schema_for!(Violation),
        "AcceleratorRequirement" => schema_for!(AcceleratorRequirement),
        "AcceleratorCapability" => schema_for!(AcceleratorCapability),
        "ValidationResult" => schema_for!(ValidationResult),
        "InstanceRecommendation" => schema_for!(InstanceRecommendation),
        "CompatibilityReport" => schema_for!(CompatibilityReport),
        "EnvVarValidation" => schema_for!(EnvVarValidation),
        "Catalog" => schema_for!(Catalog),
        "GenerateReport" => schema_for!(GenerateReport),
        _ => return None,
    };

    Some(serde_json::to_value(schema).map_err(Error::from))
}

/// Every schema, keyed by type name.
pub fn generate_all_schemas() -> Result<BTreeMap<String, Value>, Error> {
    let mut schemas = BTreeMap::new();
    for (name, _desc) in available_schemas() {
        if let Some(schema) = generate_schema(name) {
            schemas.insert(name.to_string(), schema?);
        }
    }
    Ok(schemas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            let schema = generate_schema(name);
            assert!(
                matches!(schema, Some(Ok(_))),
                "Schema for '{}' should generate",
                name
            );
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("UnknownType").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_schema_structure() {
        let schema = generate_schema("GenerateReport").unwrap().unwrap();
        assert!(schema.get("$schema").is_some() || schema.get("type").is_some());
        let properties = schema.get("properties").unwrap();
        assert!(properties.get("configuration").is_some());
        assert!(properties.get("snapshot").is_some());
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas().unwrap();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("ValidationResult"));
    }
}
