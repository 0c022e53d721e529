//! No-mock catalog tests: load real catalog files and run the validators
//! against them.

use mcc_compat::{
    Catalog, CatalogError, CompatibilityValidator, EnvVarOptions, EnvVarValidator,
};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn builtin_llm_servers_recommend_gpu_instances() {
    let catalog = Catalog::builtin().unwrap();
    let validator = CompatibilityValidator::with_defaults();
    let requirement = catalog
        .framework("vllm")
        .and_then(|fw| fw.accelerator.clone())
        .unwrap();

    let recommended = validator.get_recommended_instance_types(&requirement, catalog.capability_map());
    let names: Vec<_> = recommended.iter().map(|r| r.instance_type.as_str()).collect();

    assert!(names.contains(&"ml.g5.xlarge"));
    assert!(!names.contains(&"ml.m5.xlarge"));
    assert!(!names.contains(&"ml.inf2.xlarge"));
    assert!(recommended.iter().all(|r| r.family == "cuda"));
}

#[test]
fn djl_needs_neuron_hardware() {
    let catalog = Catalog::builtin().unwrap();
    let validator = CompatibilityValidator::with_defaults();
    let requirement = catalog
        .framework("djl")
        .and_then(|fw| fw.accelerator.clone())
        .unwrap();

    let gpu = catalog.instance_for("gpu-enabled", None).unwrap();
    let result = validator.check_compatibility(&requirement, &gpu.accelerator);
    assert!(!result.compatible);

    let inf2 = catalog.instance_for("custom", Some("ml.inf2.xlarge")).unwrap();
    let result = validator.check_compatibility(&requirement, &inf2.accelerator);
    assert!(result.compatible, "{:?}", result);
}

#[test]
fn builtin_reports_flag_vllm_toggle() {
    let catalog = Catalog::builtin().unwrap();
    let specs = &catalog.framework("vllm").unwrap().env_vars;
    let validator = EnvVarValidator::new(catalog.env_reports.clone());

    let env: BTreeMap<String, String> = [
        ("VLLM_USE_V1".to_string(), "1".to_string()),
        ("SWAP_SPACE".to_string(), "4".to_string()),
        ("MAX_MODEL_LEN".to_string(), "8192".to_string()),
    ]
    .into_iter()
    .collect();
    let result = validator.validate(&env, specs, &EnvVarOptions::default());

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let flagged: Vec<_> = result.warnings.iter().map(|w| w.variable.as_str()).collect();
    assert!(flagged.contains(&"VLLM_USE_V1"));
    assert!(flagged.contains(&"SWAP_SPACE"));
    assert!(!flagged.contains(&"MAX_MODEL_LEN"));
}

#[test]
fn custom_catalog_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
            "frameworks": [{"name": "custom-server", "accelerator": {"family": "rocm", "version": "6.0"}}],
            "instances": [
                {"name": "mi300", "accelerator": {"family": "rocm", "available_versions": ["6.1"]}}
            ]
        }"#,
    )
    .unwrap();

    let catalog = Catalog::from_path(&path).unwrap();
    let requirement = catalog.framework("custom-server").unwrap().accelerator.clone().unwrap();
    let recommended = CompatibilityValidator::with_defaults()
        .get_recommended_instance_types(&requirement, catalog.capability_map());
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].instance_type, "mi300");
}

#[test]
fn missing_catalog_file() {
    let err = Catalog::from_path(std::path::Path::new("/nonexistent/catalog.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}
