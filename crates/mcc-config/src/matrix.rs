//! The parameter matrix.
//!
//! Every parameter the generator understands has exactly one `ParameterSpec`
//! here. A name that is not in the matrix is never read from any source.
//! Specs are plain data; the only behavior they carry is an optional
//! validator and an optional generator function reference.

use std::fmt;

use mcc_common::{Error, StructuralError};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::derive;
use crate::validate::{self, ValidationContext};
use crate::Value;

/// Parameter names.
pub mod params {
    pub const PROJECT_NAME: &str = "projectName";
    pub const DESTINATION_DIR: &str = "destinationDir";
    pub const FRAMEWORK: &str = "framework";
    pub const MODEL_SERVER: &str = "modelServer";
    pub const MODEL_FORMAT: &str = "modelFormat";
    pub const MODEL_NAME: &str = "modelName";
    pub const INCLUDE_SAMPLE_MODEL: &str = "includeSampleModel";
    pub const INCLUDE_TESTING: &str = "includeTesting";
    pub const TEST_TYPES: &str = "testTypes";
    pub const DEPLOY_TARGET: &str = "deployTarget";
    pub const CODEBUILD_COMPUTE_TYPE: &str = "codebuildComputeType";
    pub const CODEBUILD_PROJECT_NAME: &str = "codebuildProjectName";
    pub const INSTANCE_TYPE: &str = "instanceType";
    pub const CUSTOM_INSTANCE_TYPE: &str = "customInstanceType";
    pub const AWS_REGION: &str = "awsRegion";
    pub const AWS_ROLE_ARN: &str = "awsRoleArn";
    pub const HF_TOKEN: &str = "hfToken";
    pub const SKIP_PROMPTS: &str = "skipPrompts";

    /// Computed at finalize time; never read from a source.
    pub const BUILD_TIMESTAMP: &str = "buildTimestamp";
}

/// Input source classes a parameter may be whitelisted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Named command-line flag.
    CliOption,
    /// The positional project-name argument.
    CliArgument,
    /// Process environment variable.
    EnvVar,
    /// External or conventional configuration document.
    ConfigFile,
    /// Named section in package.json.
    PackageJson,
}

impl Source {
    pub const ALL: &'static [Source] = &[
        Source::CliOption,
        Source::CliArgument,
        Source::EnvVar,
        Source::ConfigFile,
        Source::PackageJson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::CliOption => "cli_option",
            Source::CliArgument => "cli_argument",
            Source::EnvVar => "env_var",
            Source::ConfigFile => "config_file",
            Source::PackageJson => "package_json",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of a parameter's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Bool,
    List,
}

impl ValueKind {
    /// Coerce a loosely-typed input into this kind.
    ///
    /// Environment variables and flags arrive as strings; booleans accept
    /// true/false/yes/no/on/off/1/0 and lists are comma separated. Values
    /// that cannot be coerced are returned unchanged for the validator to flag.
    pub fn coerce(&self, value: Value) -> Value {
        match (self, value) {
            (ValueKind::Bool, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Value::Bool(true),
                "false" | "no" | "off" | "0" => Value::Bool(false),
                _ => Value::String(s),
            },
            (ValueKind::List, Value::String(s)) => Value::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            ),
            (_, other) => other,
        }
    }
}

/// Built-in default for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// Per-value validator.
///
/// `Ok` carries soft violations (possibly none); `Err` is a structural
/// error that aborts finalization immediately.
pub type ValueValidator =
    fn(&Value, &ValidationContext<'_>) -> Result<Vec<String>, StructuralError>;

/// Synthesizes a value for a required parameter left unset.
pub type ValueGenerator = fn(&mut dyn RngCore) -> Value;

/// Static description of one logical parameter.
#[derive(Clone)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ValueKind,
    pub allowed_sources: &'static [Source],
    pub cli_flag: Option<&'static str>,
    pub env_var: Option<&'static str>,
    pub default: Option<DefaultValue>,
    pub required: bool,
    pub promptable: bool,
    /// Value is a secret and is redacted in snapshots.
    pub sensitive: bool,
    pub auto_generate: Option<ValueGenerator>,
    pub validator: Option<ValueValidator>,
}

impl ParameterSpec {
    pub fn new(name: &'static str, kind: ValueKind, description: &'static str) -> Self {
        ParameterSpec {
            name,
            description,
            kind,
            allowed_sources: &[],
            cli_flag: None,
            env_var: None,
            default: None,
            required: false,
            promptable: false,
            sensitive: false,
            auto_generate: None,
            validator: None,
        }
    }

    pub fn sources(mut self, sources: &'static [Source]) -> Self {
        self.allowed_sources = sources;
        self
    }

    pub fn cli_flag(mut self, flag: &'static str) -> Self {
        self.cli_flag = Some(flag);
        self
    }

    pub fn env_var(mut self, var: &'static str) -> Self {
        self.env_var = Some(var);
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn promptable(mut self) -> Self {
        self.promptable = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn auto_generate(mut self, generator: ValueGenerator) -> Self {
        self.auto_generate = Some(generator);
        self
    }

    pub fn validator(mut self, validator: ValueValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Whether values from `source` may be used for this parameter.
    pub fn allows(&self, source: Source) -> bool {
        self.allowed_sources.contains(&source)
    }
}

impl fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("allowed_sources", &self.allowed_sources)
            .field("cli_flag", &self.cli_flag)
            .field("env_var", &self.env_var)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("promptable", &self.promptable)
            .field("auto_generate", &self.auto_generate.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Serializable view of a spec for `mcc params`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub description: String,
    pub kind: ValueKind,
    pub sources: Vec<Source>,
    pub cli_flag: Option<String>,
    pub env_var: Option<String>,
    pub default: Option<Value>,
    pub required: bool,
    pub promptable: bool,
    pub auto_generate: bool,
}

impl From<&ParameterSpec> for ParameterInfo {
    fn from(spec: &ParameterSpec) -> Self {
        ParameterInfo {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            kind: spec.kind,
            sources: spec.allowed_sources.to_vec(),
            cli_flag: spec.cli_flag.map(str::to_string),
            env_var: spec.env_var.map(str::to_string),
            default: spec.default.map(DefaultValue::to_value),
            required: spec.required,
            promptable: spec.promptable,
            auto_generate: spec.auto_generate.is_some(),
        }
    }
}

/// Ordered, immutable table of parameter specs.
#[derive(Debug, Clone)]
pub struct ParameterMatrix {
    specs: Vec<ParameterSpec>,
}

impl ParameterMatrix {
    /// Build a matrix, rejecting duplicate names and duplicate env mappings.
    pub fn new(specs: Vec<ParameterSpec>) -> Result<Self, Error> {
        for (idx, spec) in specs.iter().enumerate() {
            if specs[..idx].iter().any(|other| other.name == spec.name) {
                return Err(Error::Config(format!(
                    "parameter '{}' is defined more than once",
                    spec.name
                )));
            }
            if let Some(var) = spec.env_var {
                if let Some(other) = specs[..idx].iter().find(|o| o.env_var == Some(var)) {
                    return Err(Error::Config(format!(
                        "environment variable {} is mapped to both '{}' and '{}'",
                        var, other.name, spec.name
                    )));
                }
            }
        }
        Ok(ParameterMatrix { specs })
    }

    /// The generator's parameter matrix.
    pub fn builtin() -> Self {
        ParameterMatrix {
            specs: builtin_specs(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Specs in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.name)
    }

    /// Spec whose environment mapping is `var`.
    pub fn by_env_var(&self, var: &str) -> Option<&ParameterSpec> {
        self.specs.iter().find(|spec| spec.env_var == Some(var))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn info(&self) -> Vec<ParameterInfo> {
        self.specs.iter().map(ParameterInfo::from).collect()
    }
}

impl Default for ParameterMatrix {
    fn default() -> Self {
        ParameterMatrix::builtin()
    }
}

const OPT_ARG_CFG_PKG: &[Source] = &[
    Source::CliOption,
    Source::CliArgument,
    Source::ConfigFile,
    Source::PackageJson,
];
const OPT_CFG_PKG: &[Source] = &[Source::CliOption, Source::ConfigFile, Source::PackageJson];
const OPT_ENV_CFG_PKG: &[Source] = &[
    Source::CliOption,
    Source::EnvVar,
    Source::ConfigFile,
    Source::PackageJson,
];
const OPT_CFG: &[Source] = &[Source::CliOption, Source::ConfigFile];
const OPT_ONLY: &[Source] = &[Source::CliOption];

fn builtin_specs() -> Vec<ParameterSpec> {
    use params::*;
    use DefaultValue::{Bool, Str};

    vec![
        ParameterSpec::new(PROJECT_NAME, ValueKind::String, "Name of the generated project")
            .sources(OPT_ARG_CFG_PKG)
            .cli_flag("--project-name")
            .required()
            .promptable()
            .auto_generate(derive::generate_project_name)
            .validator(validate::project_name),
        ParameterSpec::new(DESTINATION_DIR, ValueKind::String, "Directory the project is written to")
            .sources(OPT_CFG_PKG)
            .cli_flag("--project-dir")
            .default_value(Str(".")),
        ParameterSpec::new(FRAMEWORK, ValueKind::String, "ML framework of the model")
            .sources(OPT_CFG_PKG)
            .cli_flag("--framework")
            .required()
            .promptable()
            .validator(validate::framework),
        ParameterSpec::new(MODEL_SERVER, ValueKind::String, "Serving stack inside the container")
            .sources(OPT_CFG_PKG)
            .cli_flag("--model-server")
            .required()
            .promptable()
            .validator(validate::model_server),
        ParameterSpec::new(MODEL_FORMAT, ValueKind::String, "Serialized model format")
            .sources(OPT_CFG_PKG)
            .cli_flag("--model-format")
            .promptable()
            .validator(validate::model_format),
        ParameterSpec::new(MODEL_NAME, ValueKind::String, "Hugging Face model identifier")
            .sources(OPT_CFG)
            .cli_flag("--model-name")
            .promptable(),
        ParameterSpec::new(INCLUDE_SAMPLE_MODEL, ValueKind::Bool, "Bundle the sample training script")
            .sources(OPT_CFG_PKG)
            .cli_flag("--include-sample")
            .default_value(Bool(false))
            .promptable()
            .validator(validate::boolean),
        ParameterSpec::new(INCLUDE_TESTING, ValueKind::Bool, "Generate test scripts")
            .sources(OPT_CFG_PKG)
            .cli_flag("--include-testing")
            .default_value(Bool(true))
            .promptable()
            .validator(validate::boolean),
        ParameterSpec::new(TEST_TYPES, ValueKind::List, "Kinds of tests to generate")
            .sources(OPT_CFG_PKG)
            .cli_flag("--test-types")
            .promptable()
            .validator(validate::test_types),
        ParameterSpec::new(DEPLOY_TARGET, ValueKind::String, "Where the container is built and deployed")
            .sources(OPT_ENV_CFG_PKG)
            .cli_flag("--deploy-target")
            .env_var("ML_DEPLOY_TARGET")
            .default_value(Str("sagemaker"))
            .required()
            .promptable()
            .validator(validate::deploy_target),
        ParameterSpec::new(CODEBUILD_COMPUTE_TYPE, ValueKind::String, "CodeBuild compute size")
            .sources(OPT_ENV_CFG_PKG)
            .cli_flag("--codebuild-compute-type")
            .env_var("ML_CODEBUILD_COMPUTE_TYPE")
            .default_value(Str("BUILD_GENERAL1_MEDIUM"))
            .promptable()
            .validator(validate::codebuild_compute_type),
        ParameterSpec::new(CODEBUILD_PROJECT_NAME, ValueKind::String, "CodeBuild project name")
            .sources(OPT_CFG_PKG)
            .cli_flag("--codebuild-project-name")
            .validator(validate::codebuild_project_name),
        ParameterSpec::new(INSTANCE_TYPE, ValueKind::String, "Instance class for the endpoint")
            .sources(OPT_ENV_CFG_PKG)
            .cli_flag("--instance-type")
            .env_var("ML_INSTANCE_TYPE")
            .default_value(Str("cpu-optimized"))
            .required()
            .promptable()
            .validator(validate::instance_type),
        ParameterSpec::new(CUSTOM_INSTANCE_TYPE, ValueKind::String, "Explicit SageMaker instance type")
            .sources(OPT_CFG_PKG)
            .cli_flag("--custom-instance-type")
            .promptable()
            .validator(validate::custom_instance_type),
        ParameterSpec::new(AWS_REGION, ValueKind::String, "AWS region")
            .sources(OPT_ENV_CFG_PKG)
            .cli_flag("--region")
            .env_var("AWS_REGION")
            .default_value(Str("us-east-1"))
            .required()
            .promptable()
            .validator(validate::aws_region),
        ParameterSpec::new(AWS_ROLE_ARN, ValueKind::String, "IAM execution role for the endpoint")
            .sources(OPT_ENV_CFG_PKG)
            .cli_flag("--role-arn")
            .env_var("AWS_ROLE")
            .promptable()
            .validator(validate::aws_role_arn),
        ParameterSpec::new(HF_TOKEN, ValueKind::String, "Hugging Face access token")
            .sources(OPT_CFG)
            .cli_flag("--hf-token")
            .promptable()
            .sensitive(),
        ParameterSpec::new(SKIP_PROMPTS, ValueKind::Bool, "Never prompt; fail on missing values")
            .sources(OPT_ONLY)
            .cli_flag("--skip-prompts")
            .default_value(Bool(false))
            .validator(validate::boolean),
    ]
}
