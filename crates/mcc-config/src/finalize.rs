//! Finalization: prompt merge, derived fields and required enforcement.
//!
//! Steps, in order:
//! 1. Merge prompt answers into every promptable parameter that has no
//!    explicit value. Explicit values are never overridden; defaults are.
//! 2. Auto-generate required parameters that are still null.
//! 3. Compute derived fields.
//! 4. Run per-parameter validators on every non-null value. A structural
//!    error aborts at once; everything else is collected.
//! 5. Report every required parameter that is still null.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use mcc_common::StructuralError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{derive, snapshot};
use crate::matrix::{params, ParameterMatrix, ValueKind};
use crate::resolve::{Provenance, ResolvedConfiguration};
use crate::validate::{ValidationContext, LLM_SERVERS};
use crate::{Value, ValueMap};

/// Flat name → answer map handed back by the prompting layer.
pub type PromptAnswers = ValueMap;

/// Frameworks whose containers never bundle the sample model.
const SAMPLE_MODEL_UNSUPPORTED_FRAMEWORKS: &[&str] = &["transformers"];

/// What kind of problem a violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required parameter with no value.
    Missing,
    /// Value present but rejected by its validator.
    Invalid,
}

/// One finalize-time finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub parameter: String,
    pub message: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn missing(parameter: &str) -> Self {
        Violation {
            parameter: parameter.to_string(),
            message: format!("required parameter '{}' has no value", parameter),
            kind: ViolationKind::Missing,
        }
    }

    pub fn invalid(parameter: &str, message: impl Into<String>) -> Self {
        Violation {
            parameter: parameter.to_string(),
            message: message.into(),
            kind: ViolationKind::Invalid,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Why finalization failed.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("{} violation(s): {}", .0.len(), join_messages(.0))]
    Violations(Vec<Violation>),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FinalizeError {
    /// Violations, if this is the collected kind.
    pub fn violations(&self) -> &[Violation] {
        match self {
            FinalizeError::Violations(v) => v,
            FinalizeError::Structural(_) => &[],
        }
    }
}

impl From<FinalizeError> for mcc_common::Error {
    fn from(err: FinalizeError) -> Self {
        match err {
            FinalizeError::Structural(inner) => mcc_common::Error::Structural(inner),
            FinalizeError::Violations(violations) => {
                if violations.iter().all(|v| v.kind == ViolationKind::Missing) {
                    mcc_common::Error::MissingRequired {
                        parameters: violations.into_iter().map(|v| v.parameter).collect(),
                    }
                } else {
                    mcc_common::Error::Violations {
                        messages: violations.into_iter().map(|v| v.message).collect(),
                    }
                }
            }
        }
    }
}

/// A question the prompting layer should ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub name: String,
    pub description: String,
    pub kind: ValueKind,
    /// Currently resolved value, offered as the default answer.
    pub default: Option<Value>,
    pub sensitive: bool,
}

/// The configuration handed to the template stage. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinalConfiguration {
    values: ValueMap,
    provenance: BTreeMap<String, Provenance>,
    generated_at: DateTime<Utc>,
}

impl FinalConfiguration {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn provenance(&self, name: &str) -> Provenance {
        self.provenance
            .get(name)
            .copied()
            .unwrap_or(Provenance::Unset)
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn provenance_map(&self) -> &BTreeMap<String, Provenance> {
        &self.provenance
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Values that came from an explicit source.
    pub fn explicit_only(&self) -> ValueMap {
        self.values
            .iter()
            .filter(|(name, _)| self.provenance(name).is_explicit())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// A copy safe to print: sensitive values replaced by the redaction marker.
    pub fn redacted(&self, matrix: &ParameterMatrix) -> FinalConfiguration {
        FinalConfiguration {
            values: snapshot::redact(matrix, self.values.clone()),
            provenance: self.provenance.clone(),
            generated_at: self.generated_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Turns a resolved configuration into a final one.
#[derive(Debug)]
pub struct ConfigFinalizer<'m> {
    matrix: &'m ParameterMatrix,
    rng: StdRng,
    timestamp: Option<DateTime<Utc>>,
}

impl<'m> ConfigFinalizer<'m> {
    pub fn new(matrix: &'m ParameterMatrix) -> Self {
        ConfigFinalizer {
            matrix,
            rng: StdRng::seed_from_u64(rand::random()),
            timestamp: None,
        }
    }

    /// Deterministic generated values.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fixed generation timestamp instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Prompting is only a gap filler: skip it when asked to, or when every
    /// required promptable parameter already has an explicit value.
    pub fn should_skip_prompts(&self, resolved: &ResolvedConfiguration) -> bool {
        if resolved.get_bool(params::SKIP_PROMPTS) == Some(true) {
            return true;
        }
        self.matrix
            .iter()
            .filter(|spec| spec.required && spec.promptable)
            .all(|spec| resolved.is_explicit(spec.name))
    }

    /// Promptable parameters without an explicit value, in matrix order.
    pub fn pending_prompts(&self, resolved: &ResolvedConfiguration) -> Vec<PromptRequest> {
        self.matrix
            .iter()
            .filter(|spec| spec.promptable && !resolved.is_explicit(spec.name))
            .map(|spec| PromptRequest {
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                kind: spec.kind,
                default: resolved.get(spec.name).cloned(),
                sensitive: spec.sensitive,
            })
            .collect()
    }

    pub fn finalize(
        &mut self,
        resolved: &ResolvedConfiguration,
        answers: &PromptAnswers,
    ) -> Result<FinalConfiguration, FinalizeError> {
        let generated_at = self.timestamp.unwrap_or_else(Utc::now);
        let mut draft = Draft::from(resolved.clone());

        self.merge_answers(&mut draft, answers);
        self.generate_missing(&mut draft);
        derive_fields(&mut draft, generated_at);

        let violations = self.check(&draft)?;
        if !violations.is_empty() {
            debug!(count = violations.len(), "finalize rejected configuration");
            return Err(FinalizeError::Violations(violations));
        }

        info!(parameters = draft.values.len(), "configuration finalized");
        Ok(FinalConfiguration {
            values: draft.values,
            provenance: draft.provenance,
            generated_at,
        })
    }

    fn merge_answers(&self, draft: &mut Draft, answers: &PromptAnswers) {
        for (name, answer) in answers {
            let Some(spec) = self.matrix.get(name) else {
                debug!(parameter = %name, "ignoring answer for unknown parameter");
                continue;
            };
            if !spec.promptable || draft.is_explicit(name) || answer.is_null() {
                continue;
            }
            draft.set(spec.name, spec.kind.coerce(answer.clone()), Provenance::Prompt);
        }
    }

    fn generate_missing(&mut self, draft: &mut Draft) {
        for spec in self.matrix.iter() {
            if !spec.required || draft.values.contains_key(spec.name) {
                continue;
            }
            if let Some(generate) = spec.auto_generate {
                let value = generate(&mut self.rng);
                debug!(parameter = spec.name, "auto-generated value");
                draft.set(spec.name, value, Provenance::Generated);
            }
        }
    }

    fn check(&self, draft: &Draft) -> Result<Vec<Violation>, StructuralError> {
        let ctx = ValidationContext::new(&draft.values);
        let mut violations = Vec::new();

        for spec in self.matrix.iter() {
            match draft.values.get(spec.name) {
                None if spec.required => violations.push(Violation::missing(spec.name)),
                None => {}
                Some(value) => {
                    if let Some(validate) = spec.validator {
                        for message in validate(value, &ctx)? {
                            violations.push(Violation::invalid(spec.name, message));
                        }
                    }
                }
            }
        }

        Ok(violations)
    }
}

/// Mutable working copy used during one finalize pass.
struct Draft {
    values: ValueMap,
    provenance: BTreeMap<String, Provenance>,
}

impl From<ResolvedConfiguration> for Draft {
    fn from(resolved: ResolvedConfiguration) -> Self {
        let (values, provenance) = resolved.into_parts();
        Draft { values, provenance }
    }
}

impl Draft {
    fn provenance(&self, name: &str) -> Provenance {
        self.provenance
            .get(name)
            .copied()
            .unwrap_or(Provenance::Unset)
    }

    /// Unresolved `$NAME` tokens keep their source but carry no value.
    fn is_explicit(&self, name: &str) -> bool {
        self.provenance(name).is_explicit() && self.values.contains_key(name)
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    fn set(&mut self, name: &str, value: Value, provenance: Provenance) {
        self.values.insert(name.to_string(), value);
        self.provenance.insert(name.to_string(), provenance);
    }

    fn clear(&mut self, name: &str) {
        if self.values.remove(name).is_some() {
            self.provenance.insert(name.to_string(), Provenance::Derived);
        }
    }
}

fn derive_fields(draft: &mut Draft, generated_at: DateTime<Utc>) {
    let framework = draft.get_str(params::FRAMEWORK).map(str::to_string);
    let server = draft.get_str(params::MODEL_SERVER).map(str::to_string);

    let sample_unsupported = framework
        .as_deref()
        .is_some_and(|f| SAMPLE_MODEL_UNSUPPORTED_FRAMEWORKS.contains(&f))
        || server.as_deref().is_some_and(|s| LLM_SERVERS.contains(&s));
    if sample_unsupported && draft.values.get(params::INCLUDE_SAMPLE_MODEL) == Some(&Value::Bool(true)) {
        debug!("sample model not supported by serving stack; forcing off");
        draft.set(params::INCLUDE_SAMPLE_MODEL, Value::Bool(false), Provenance::Derived);
    }

    if draft.get_str(params::DEPLOY_TARGET) == Some("codebuild")
        && !draft.values.contains_key(params::CODEBUILD_PROJECT_NAME)
    {
        if let (Some(project), Some(framework)) = (draft.get_str(params::PROJECT_NAME), framework.as_deref()) {
            let name = derive::codebuild_project_name(project, framework);
            draft.set(params::CODEBUILD_PROJECT_NAME, Value::String(name), Provenance::Derived);
        }
    }

    if draft.values.get(params::INCLUDE_TESTING) == Some(&Value::Bool(false)) {
        draft.clear(params::TEST_TYPES);
    }

    if draft.provenance(params::PROJECT_NAME) == Provenance::CliArgument
        && !draft.is_explicit(params::DESTINATION_DIR)
    {
        if let Some(project) = draft.get_str(params::PROJECT_NAME) {
            let base = draft.get_str(params::DESTINATION_DIR).unwrap_or(".");
            let destination = format!("{}/{}", base.trim_end_matches('/'), project);
            draft.set(params::DESTINATION_DIR, Value::String(destination), Provenance::Derived);
        }
    }

    draft.set(
        params::BUILD_TIMESTAMP,
        Value::String(generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Provenance::Derived,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigResolver;
    use crate::source::{EnvSnapshot, Origin, RawSourceValues};
    use chrono::TimeZone;
    use serde_json::json;

    fn resolved(raw: RawSourceValues) -> ResolvedConfiguration {
        let matrix = ParameterMatrix::builtin();
        ConfigResolver::new(&matrix, EnvSnapshot::default()).resolve(&raw)
    }

    fn base() -> RawSourceValues {
        RawSourceValues::new()
            .with(Origin::CliOption, params::PROJECT_NAME, json!("demo"))
            .with(Origin::CliOption, params::FRAMEWORK, json!("sklearn"))
            .with(Origin::CliOption, params::MODEL_SERVER, json!("flask"))
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_finalize_minimal() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix).with_timestamp(fixed_time());
        let config = finalizer.finalize(&resolved(base()), &PromptAnswers::new()).unwrap();

        assert_eq!(config.get_str(params::FRAMEWORK), Some("sklearn"));
        assert_eq!(config.get_str(params::AWS_REGION), Some("us-east-1"));
        assert_eq!(config.provenance(params::AWS_REGION), Provenance::Default);
        assert_eq!(config.get_str(params::BUILD_TIMESTAMP), Some("2026-03-01T12:00:00Z"));
        assert_eq!(config.provenance(params::BUILD_TIMESTAMP), Provenance::Derived);
    }

    #[test]
    fn test_missing_required_collected() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = RawSourceValues::new().with(Origin::CliOption, params::PROJECT_NAME, json!("demo"));

        let err = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap_err();
        let missing: Vec<_> = err.violations().iter().map(|v| v.parameter.as_str()).collect();
        assert_eq!(missing, vec![params::FRAMEWORK, params::MODEL_SERVER]);

        let common: mcc_common::Error = err.into();
        assert_eq!(common.code(), 21);
    }

    #[test]
    fn test_project_name_auto_generated() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix).with_seed(3);
        let raw = RawSourceValues::new()
            .with(Origin::CliOption, params::FRAMEWORK, json!("xgboost"))
            .with(Origin::CliOption, params::MODEL_SERVER, json!("fastapi"));

        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert!(config.get_str(params::PROJECT_NAME).is_some());
        assert_eq!(config.provenance(params::PROJECT_NAME), Provenance::Generated);
    }

    #[test]
    fn test_prompt_answers_fill_gaps_only() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let answers: PromptAnswers = [
            (params::FRAMEWORK.to_string(), json!("tensorflow")),
            (params::AWS_REGION.to_string(), json!("eu-west-1")),
            (params::DESTINATION_DIR.to_string(), json!("/tmp/elsewhere")),
        ]
        .into_iter()
        .collect();

        let config = finalizer.finalize(&resolved(base()), &answers).unwrap();
        // explicit value wins over the answer
        assert_eq!(config.get_str(params::FRAMEWORK), Some("sklearn"));
        // answer beats the default
        assert_eq!(config.get_str(params::AWS_REGION), Some("eu-west-1"));
        assert_eq!(config.provenance(params::AWS_REGION), Provenance::Prompt);
        // not promptable
        assert_eq!(config.get_str(params::DESTINATION_DIR), Some("."));
    }

    #[test]
    fn test_sample_model_forced_off_for_llm_server() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = RawSourceValues::new()
            .with(Origin::CliOption, params::PROJECT_NAME, json!("llm"))
            .with(Origin::CliOption, params::FRAMEWORK, json!("transformers"))
            .with(Origin::CliOption, params::MODEL_SERVER, json!("vllm"))
            .with(Origin::CliOption, params::INCLUDE_SAMPLE_MODEL, json!(true));

        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert_eq!(config.get_bool(params::INCLUDE_SAMPLE_MODEL), Some(false));
        assert_eq!(
            config.provenance(params::INCLUDE_SAMPLE_MODEL),
            Provenance::Derived
        );
    }

    #[test]
    fn test_codebuild_name_derived() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = base()
            .with(Origin::CliOption, params::PROJECT_NAME, json!("fraud.detector"))
            .with(Origin::EnvVar, params::DEPLOY_TARGET, json!("codebuild"));

        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert_eq!(
            config.get_str(params::CODEBUILD_PROJECT_NAME),
            Some("fraud-detector-sklearn-build")
        );
    }

    #[test]
    fn test_codebuild_name_kept_when_supplied() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = base()
            .with(Origin::CliOption, params::DEPLOY_TARGET, json!("codebuild"))
            .with(Origin::LocalConfig, params::CODEBUILD_PROJECT_NAME, json!("my-build"));

        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert_eq!(config.get_str(params::CODEBUILD_PROJECT_NAME), Some("my-build"));
    }

    #[test]
    fn test_destination_from_positional() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = RawSourceValues::new()
            .with(Origin::CliArgument, params::PROJECT_NAME, json!("demo"))
            .with(Origin::CliOption, params::FRAMEWORK, json!("sklearn"))
            .with(Origin::CliOption, params::MODEL_SERVER, json!("flask"));

        let config = finalizer.finalize(&resolved(raw.clone()), &PromptAnswers::new()).unwrap();
        assert_eq!(config.get_str(params::DESTINATION_DIR), Some("./demo"));

        let raw = raw.with(Origin::CliOption, params::DESTINATION_DIR, json!("/out"));
        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert_eq!(config.get_str(params::DESTINATION_DIR), Some("/out"));
    }

    #[test]
    fn test_test_types_cleared_without_testing() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = base()
            .with(Origin::CliOption, params::INCLUDE_TESTING, json!(false))
            .with(Origin::CliOption, params::TEST_TYPES, json!(["local-model-cli"]));

        let config = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap();
        assert!(config.get(params::TEST_TYPES).is_none());
    }

    #[test]
    fn test_structural_error_short_circuits() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = RawSourceValues::new()
            .with(Origin::CliOption, params::AWS_ROLE_ARN, json!("not-an-arn"));

        let err = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap_err();
        assert!(matches!(err, FinalizeError::Structural(_)));
        let common: mcc_common::Error = err.into();
        assert_eq!(common.code(), 20);
    }

    #[test]
    fn test_invalid_values_reported_with_missing() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = RawSourceValues::new()
            .with(Origin::CliOption, params::PROJECT_NAME, json!("demo"))
            .with(Origin::CliOption, params::FRAMEWORK, json!("pytorch"));

        let err = finalizer.finalize(&resolved(raw), &PromptAnswers::new()).unwrap_err();
        let kinds: Vec<_> = err.violations().iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::Invalid));
        assert!(kinds.contains(&ViolationKind::Missing));
        let common: mcc_common::Error = err.into();
        assert_eq!(common.code(), 22);
    }

    #[test]
    fn test_should_skip_prompts() {
        let matrix = ParameterMatrix::builtin();
        let finalizer = ConfigFinalizer::new(&matrix);

        let partial = resolved(base());
        assert!(!finalizer.should_skip_prompts(&partial));

        let forced = resolved(RawSourceValues::new().with(Origin::CliOption, params::SKIP_PROMPTS, json!(true)));
        assert!(finalizer.should_skip_prompts(&forced));

        let complete = resolved(
            base()
                .with(Origin::EnvVar, params::DEPLOY_TARGET, json!("sagemaker"))
                .with(Origin::EnvVar, params::INSTANCE_TYPE, json!("cpu-optimized"))
                .with(Origin::EnvVar, params::AWS_REGION, json!("us-west-2")),
        );
        assert!(finalizer.should_skip_prompts(&complete));
    }

    #[test]
    fn test_pending_prompts_skip_explicit() {
        let matrix = ParameterMatrix::builtin();
        let finalizer = ConfigFinalizer::new(&matrix);
        let pending = finalizer.pending_prompts(&resolved(base()));
        let names: Vec<_> = pending.iter().map(|p| p.name.as_str()).collect();

        assert!(!names.contains(&params::FRAMEWORK));
        assert!(names.contains(&params::AWS_REGION));
        assert!(!names.contains(&params::DESTINATION_DIR));
        let region = pending.iter().find(|p| p.name == params::AWS_REGION).unwrap();
        assert_eq!(region.default, Some(json!("us-east-1")));
    }

    #[test]
    fn test_answer_fills_unresolved_token() {
        let matrix = ParameterMatrix::builtin();
        let mut finalizer = ConfigFinalizer::new(&matrix);
        let raw = base()
            .with(Origin::LocalConfig, params::HF_TOKEN, json!("$HF_TOKEN"))
            .with(Origin::CliOption, params::AWS_REGION, json!("$NOPE"));
        let resolved = resolved(raw);

        let pending: Vec<_> = finalizer
            .pending_prompts(&resolved)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert!(pending.iter().any(|n| n == params::HF_TOKEN));
        assert!(pending.iter().any(|n| n == params::AWS_REGION));

        let answers: PromptAnswers = [
            (params::HF_TOKEN.to_string(), json!("hf_typed")),
            (params::AWS_REGION.to_string(), json!("eu-west-1")),
        ]
        .into_iter()
        .collect();
        let config = finalizer.finalize(&resolved, &answers).unwrap();
        assert_eq!(config.get_str(params::HF_TOKEN), Some("hf_typed"));
        assert_eq!(config.provenance(params::HF_TOKEN), Provenance::Prompt);
        assert_eq!(config.get_str(params::AWS_REGION), Some("eu-west-1"));
    }
}
