//! Per-parameter value validators.
//!
//! Validators return soft violation messages for values that are usable but
//! wrong (an unknown framework, a format the framework does not load), and a
//! `StructuralError` for values that cannot be interpreted at all.

use std::sync::LazyLock;

use mcc_common::StructuralError;
use regex::Regex;

use crate::matrix::params;
use crate::{Value, ValueMap};

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

static CODEBUILD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{1,254}$").expect("valid regex"));

static INSTANCE_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ml\.[a-z0-9]+\.[a-z0-9]+$").expect("valid regex"));

static AWS_REGION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]*)?-[a-z]+-\d+$").expect("valid regex"));

static ROLE_ARN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^arn:aws[a-z-]*:iam::\d{12}:role/[A-Za-z0-9+=,.@_/-]{1,512}$").expect("valid regex"));

pub const FRAMEWORKS: &[&str] = &["sklearn", "xgboost", "tensorflow", "transformers"];

pub const TRADITIONAL_SERVERS: &[&str] = &["flask", "fastapi"];
pub const LLM_SERVERS: &[&str] = &["vllm", "sglang", "tensorrt-llm", "lmi", "djl"];

pub const TEST_TYPES: &[&str] = &[
    "local-model-cli",
    "local-model-server",
    "hosted-model-endpoint",
];

pub const DEPLOY_TARGETS: &[&str] = &["sagemaker", "codebuild"];

pub const CODEBUILD_COMPUTE_TYPES: &[&str] = &[
    "BUILD_GENERAL1_SMALL",
    "BUILD_GENERAL1_MEDIUM",
    "BUILD_GENERAL1_LARGE",
];

pub const INSTANCE_TYPES: &[&str] = &["cpu-optimized", "gpu-enabled", "custom"];

/// Model formats each traditional framework can load.
pub fn model_formats(framework: &str) -> &'static [&'static str] {
    match framework {
        "sklearn" => &["pkl", "joblib"],
        "xgboost" => &["json", "model", "ubj"],
        "tensorflow" => &["keras", "h5", "SavedModel"],
        _ => &[],
    }
}

/// Serving stacks available for a framework.
pub fn model_servers(framework: &str) -> &'static [&'static str] {
    match framework {
        "transformers" => LLM_SERVERS,
        "sklearn" | "xgboost" | "tensorflow" => TRADITIONAL_SERVERS,
        _ => &[],
    }
}

/// Read-only view of the merged configuration handed to validators.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    values: &'a ValueMap,
}

impl<'a> ValidationContext<'a> {
    pub fn new(values: &'a ValueMap) -> Self {
        ValidationContext { values }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }
}

fn expect_str<'v>(name: &str, value: &'v Value) -> Result<&'v str, StructuralError> {
    value
        .as_str()
        .ok_or_else(|| StructuralError::new(name, value.to_string(), "must be a string"))
}

fn one_of(name: &str, value: &str, allowed: &[&str]) -> Vec<String> {
    if allowed.contains(&value) {
        Vec::new()
    } else {
        vec![format!(
            "{} '{}' is not supported (expected one of: {})",
            name,
            value,
            allowed.join(", ")
        )]
    }
}

pub fn project_name(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let name = expect_str(params::PROJECT_NAME, value)?;
    if PROJECT_NAME_RE.is_match(name) {
        Ok(Vec::new())
    } else {
        Ok(vec![format!(
            "projectName '{}' may only contain letters, digits, '.', '_' and '-' and must start with a letter or digit",
            name
        )])
    }
}

pub fn framework(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let framework = expect_str(params::FRAMEWORK, value)?;
    Ok(one_of(params::FRAMEWORK, framework, FRAMEWORKS))
}

pub fn model_server(value: &Value, ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let server = expect_str(params::MODEL_SERVER, value)?;
    match ctx.get_str(params::FRAMEWORK) {
        Some(framework) if FRAMEWORKS.contains(&framework) => {
            let servers = model_servers(framework);
            if servers.contains(&server) {
                Ok(Vec::new())
            } else {
                Ok(vec![format!(
                    "modelServer '{}' cannot serve {} models (expected one of: {})",
                    server,
                    framework,
                    servers.join(", ")
                )])
            }
        }
        _ => {
            let all: Vec<&str> = TRADITIONAL_SERVERS.iter().chain(LLM_SERVERS).copied().collect();
            Ok(one_of(params::MODEL_SERVER, server, &all))
        }
    }
}

pub fn model_format(value: &Value, ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let format = expect_str(params::MODEL_FORMAT, value)?;
    let Some(framework) = ctx.get_str(params::FRAMEWORK) else {
        return Ok(Vec::new());
    };
    let formats = model_formats(framework);
    if formats.is_empty() || formats.contains(&format) {
        Ok(Vec::new())
    } else {
        Ok(vec![format!(
            "modelFormat '{}' is not loadable by {} (expected one of: {})",
            format,
            framework,
            formats.join(", ")
        )])
    }
}

pub fn boolean(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    match value {
        Value::Bool(_) => Ok(Vec::new()),
        other => Ok(vec![format!("expected true or false, got {}", other)]),
    }
}

pub fn test_types(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let Some(items) = value.as_array() else {
        return Err(StructuralError::new(
            params::TEST_TYPES,
            value.to_string(),
            "must be a list of test types",
        ));
    };
    let mut violations = Vec::new();
    for item in items {
        match item.as_str() {
            Some(test_type) => violations.extend(one_of(params::TEST_TYPES, test_type, TEST_TYPES)),
            None => violations.push(format!("testTypes entry {} is not a string", item)),
        }
    }
    Ok(violations)
}

pub fn deploy_target(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let target = expect_str(params::DEPLOY_TARGET, value)?;
    Ok(one_of(params::DEPLOY_TARGET, target, DEPLOY_TARGETS))
}

pub fn codebuild_compute_type(
    value: &Value,
    _ctx: &ValidationContext<'_>,
) -> Result<Vec<String>, StructuralError> {
    let compute = expect_str(params::CODEBUILD_COMPUTE_TYPE, value)?;
    Ok(one_of(params::CODEBUILD_COMPUTE_TYPE, compute, CODEBUILD_COMPUTE_TYPES))
}

pub fn codebuild_project_name(
    value: &Value,
    _ctx: &ValidationContext<'_>,
) -> Result<Vec<String>, StructuralError> {
    let name = expect_str(params::CODEBUILD_PROJECT_NAME, value)?;
    if CODEBUILD_NAME_RE.is_match(name) {
        Ok(Vec::new())
    } else {
        Ok(vec![format!(
            "codebuildProjectName '{}' must be 2-255 characters of letters, digits, '_' or '-' starting with a letter or digit",
            name
        )])
    }
}

pub fn instance_type(value: &Value, ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let instance = expect_str(params::INSTANCE_TYPE, value)?;
    let mut violations = one_of(params::INSTANCE_TYPE, instance, INSTANCE_TYPES);
    if instance == "custom" && ctx.get_str(params::CUSTOM_INSTANCE_TYPE).is_none() {
        violations.push("customInstanceType is required when instanceType is 'custom'".to_string());
    }
    Ok(violations)
}

pub fn custom_instance_type(
    value: &Value,
    _ctx: &ValidationContext<'_>,
) -> Result<Vec<String>, StructuralError> {
    let instance = expect_str(params::CUSTOM_INSTANCE_TYPE, value)?;
    if INSTANCE_TYPE_RE.is_match(instance) {
        Ok(Vec::new())
    } else {
        Ok(vec![format!(
            "customInstanceType '{}' must look like ml.<family>.<size>, e.g. ml.g5.xlarge",
            instance
        )])
    }
}

pub fn aws_region(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let region = expect_str(params::AWS_REGION, value)?;
    if AWS_REGION_RE.is_match(region) {
        Ok(Vec::new())
    } else {
        Ok(vec![format!("awsRegion '{}' is not a valid AWS region name", region)])
    }
}

/// Role ARNs are structural: a malformed ARN aborts finalization.
pub fn aws_role_arn(value: &Value, _ctx: &ValidationContext<'_>) -> Result<Vec<String>, StructuralError> {
    let arn = expect_str(params::AWS_ROLE_ARN, value)?;
    if ROLE_ARN_RE.is_match(arn) {
        Ok(Vec::new())
    } else {
        Err(StructuralError::new(
            params::AWS_ROLE_ARN,
            arn,
            "is not an IAM role ARN (expected arn:aws:iam::<12-digit account>:role/<name>)",
        ))
    }
}
