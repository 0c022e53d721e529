//! The generation pipeline.
//!
//! One run, strictly sequential:
//!
//! 1. collect raw values from every source
//! 2. resolve by precedence
//! 3. accelerator compatibility and environment-variable checks, when the
//!    model server and instance selection were all given explicitly
//! 4. prompt for gaps
//! 5. finalize
//!
//! A defaulted or missing selection can still change through a prompt
//! answer, so in that case the checks of step 3 run against the final
//! configuration instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mcc_common::Error;
use mcc_compat::{
    catalog::CUSTOM_INSTANCE_CLASS, AcceleratorCapability, AcceleratorRequirement, Catalog,
    CompatibilityValidator, EnvVarOptions, EnvVarValidation, EnvVarValidator,
    InstanceRecommendation, ValidationResult,
};
use mcc_config::snapshot;
use mcc_config::source::DocumentInfo;
use mcc_config::{
    params, CliInputs, ConfigFinalizer, ConfigResolver, EnvSnapshot, FinalConfiguration,
    ParameterMatrix, PromptAnswers, Provenance, RawSourceValues, ResolutionSnapshot,
    ResolvedConfiguration, ValueMap,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::prompt::Prompter;

/// Everything one `generate` run needs besides the prompter.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub cli: CliInputs,
    pub working_dir: PathBuf,
    pub env: EnvSnapshot,
    /// Container environment overrides to validate (`--env KEY=VALUE`).
    pub env_overrides: BTreeMap<String, String>,
    pub env_options: EnvVarOptions,
    /// Report incompatible accelerators as warnings instead of failing.
    pub ignore_compat: bool,
    pub run_id: Option<String>,
}

/// Outcome of checking the chosen server against the chosen instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityReport {
    pub model_server: String,
    pub instance_type: String,
    pub requirement: AcceleratorRequirement,
    pub capability: AcceleratorCapability,
    pub result: ValidationResult,
    /// Compatible alternatives, filled in only when the check failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<InstanceRecommendation>,
}

/// Payload of `mcc generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateReport {
    #[serde(default)]
    pub run_id: Option<String>,
    pub configuration: FinalConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvVarValidation>,
    pub snapshot: ResolutionSnapshot,
    /// Soft findings worth showing on stderr.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl GenerateReport {
    /// The report as printed: sensitive configuration values redacted.
    pub fn redacted(&self, matrix: &ParameterMatrix) -> GenerateReport {
        GenerateReport {
            configuration: self.configuration.redacted(matrix),
            ..self.clone()
        }
    }

    pub fn has_soft_findings(&self) -> bool {
        !self.warnings.is_empty()
            || self
                .environment
                .as_ref()
                .is_some_and(|env| !env.warnings.is_empty())
    }
}

/// Payload of `mcc resolve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolveReport {
    /// Sensitive values are redacted.
    pub values: ValueMap,
    pub provenance: BTreeMap<String, Provenance>,
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Default)]
struct Checks {
    compatibility: Option<CompatibilityReport>,
    environment: Option<EnvVarValidation>,
    warnings: Vec<String>,
}

/// The server/instance selection the checks look at.
struct Selection<'a> {
    server: Option<&'a str>,
    instance_type: Option<&'a str>,
    custom_instance_type: Option<&'a str>,
}

impl<'a> Selection<'a> {
    fn of(get: impl Fn(&str) -> Option<&'a str>) -> Self {
        Selection {
            server: get(params::MODEL_SERVER),
            instance_type: get(params::INSTANCE_TYPE),
            custom_instance_type: get(params::CUSTOM_INSTANCE_TYPE),
        }
    }
}

/// Whether prompting can no longer change what the checks look at.
fn selection_is_explicit(resolved: &ResolvedConfiguration) -> bool {
    resolved.is_explicit(params::MODEL_SERVER)
        && resolved.is_explicit(params::INSTANCE_TYPE)
        && (resolved.get_str(params::INSTANCE_TYPE) != Some(CUSTOM_INSTANCE_CLASS)
            || resolved.is_explicit(params::CUSTOM_INSTANCE_TYPE))
}

/// Resolution, validation and finalization over one matrix and catalog.
#[derive(Debug)]
pub struct Pipeline {
    matrix: ParameterMatrix,
    catalog: Catalog,
    compat: CompatibilityValidator,
    env_validator: EnvVarValidator,
    seed: Option<u64>,
    timestamp: Option<DateTime<Utc>>,
}

impl Pipeline {
    pub fn new(catalog: Catalog) -> Self {
        Pipeline {
            matrix: ParameterMatrix::builtin(),
            env_validator: EnvVarValidator::new(catalog.env_reports.clone()),
            catalog,
            compat: CompatibilityValidator::with_defaults(),
            seed: None,
            timestamp: None,
        }
    }

    /// Built-in catalog, or the one at `path`.
    pub fn load(catalog_path: Option<&Path>) -> Result<Self, Error> {
        let catalog = match catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };
        debug!(
            frameworks = catalog.frameworks.len(),
            instances = catalog.instances.len(),
            "catalog loaded"
        );
        Ok(Self::new(catalog))
    }

    pub fn with_matrix(mut self, matrix: ParameterMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_compat_validator(mut self, compat: CompatibilityValidator) -> Self {
        self.compat = compat;
        self
    }

    /// Deterministic generated values (project names).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn matrix(&self) -> &ParameterMatrix {
        &self.matrix
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn compat_validator(&self) -> &CompatibilityValidator {
        &self.compat
    }

    /// Collect and resolve without finalizing.
    pub fn resolve(
        &self,
        cli: &CliInputs,
        working_dir: &Path,
        env: &EnvSnapshot,
    ) -> Result<(RawSourceValues, ResolvedConfiguration), Error> {
        let raw = mcc_config::SourceCollector::new(&self.matrix, working_dir).collect(cli, env)?;
        info!(documents = raw.documents.len(), "sources collected");
        let resolved = ConfigResolver::new(&self.matrix, env.clone()).resolve(&raw);
        info!(parameters = resolved.values().len(), "configuration resolved");
        Ok((raw, resolved))
    }

    /// The `resolve` payload: everything, or explicit values only.
    pub fn resolve_report(
        &self,
        raw: &RawSourceValues,
        resolved: &ResolvedConfiguration,
        explicit_only: bool,
    ) -> ResolveReport {
        let values = if explicit_only {
            resolved.explicit_only()
        } else {
            resolved.values().clone()
        };
        let values = snapshot::redact(&self.matrix, values);
        let provenance = resolved
            .provenance_map()
            .iter()
            .filter(|(name, _)| !explicit_only || values.contains_key(*name))
            .map(|(name, p)| (name.clone(), *p))
            .collect();

        ResolveReport {
            values,
            provenance,
            documents: raw.documents.clone(),
        }
    }

    /// Check a model server against an instance selection.
    ///
    /// `None` when the server declares no accelerator or the instance is not
    /// in the catalog; there is nothing to compare in either case.
    pub fn check_server(
        &self,
        server: &str,
        instance_type: &str,
        custom_instance_type: Option<&str>,
    ) -> Option<CompatibilityReport> {
        let requirement = self.catalog.framework(server)?.accelerator.clone()?;
        let instance = self.catalog.instance_for(instance_type, custom_instance_type)?;

        let result = self.compat.check_compatibility(&requirement, &instance.accelerator);
        let recommendations = if result.compatible {
            Vec::new()
        } else {
            self.compat
                .get_recommended_instance_types(&requirement, self.catalog.capability_map())
        };

        Some(CompatibilityReport {
            model_server: server.to_string(),
            instance_type: instance.name.clone(),
            requirement,
            capability: instance.accelerator.clone(),
            result,
            recommendations,
        })
    }

    /// Every catalog instance whose accelerator satisfies `requirement`.
    pub fn recommend(&self, requirement: &AcceleratorRequirement) -> Vec<InstanceRecommendation> {
        self.compat
            .get_recommended_instance_types(requirement, self.catalog.capability_map())
    }

    /// Validate container environment overrides against a server's declared flags.
    ///
    /// An unknown server has no declared flags; only community reports apply.
    pub fn validate_env(
        &self,
        server: Option<&str>,
        overrides: &BTreeMap<String, String>,
        options: &EnvVarOptions,
    ) -> EnvVarValidation {
        let empty = BTreeMap::new();
        let specs = server
            .and_then(|name| self.catalog.framework(name))
            .map(|fw| &fw.env_vars)
            .unwrap_or(&empty);
        self.env_validator.validate(overrides, specs, options)
    }

    /// Run the whole pipeline.
    pub fn generate(
        &self,
        request: &GenerateRequest,
        prompter: &mut dyn Prompter,
    ) -> Result<GenerateReport, Error> {
        let (raw, resolved) = self.resolve(&request.cli, &request.working_dir, &request.env)?;
        let snapshot =
            ResolutionSnapshot::new(&self.matrix, &raw, &resolved, request.run_id.clone());

        let mut checks = if selection_is_explicit(&resolved) {
            self.run_checks(request, &Selection::of(|name| resolved.get_str(name)))?
        } else {
            debug!("server or instance not explicit; checks deferred until finalize");
            None
        };

        let mut finalizer = ConfigFinalizer::new(&self.matrix);
        if let Some(seed) = self.seed {
            finalizer = finalizer.with_seed(seed);
        }
        if let Some(timestamp) = self.timestamp {
            finalizer = finalizer.with_timestamp(timestamp);
        }

        let answers = if finalizer.should_skip_prompts(&resolved) {
            debug!("prompting skipped");
            PromptAnswers::new()
        } else {
            let requests = finalizer.pending_prompts(&resolved);
            info!(count = requests.len(), "prompting for missing parameters");
            prompter.ask(&requests)?
        };

        let configuration = finalizer.finalize(&resolved, &answers)?;

        if checks.is_none() {
            checks =
                self.run_checks(request, &Selection::of(|name| configuration.get_str(name)))?;
        }
        let checks = checks.unwrap_or_default();

        Ok(GenerateReport {
            run_id: request.run_id.clone(),
            configuration,
            compatibility: checks.compatibility,
            environment: checks.environment,
            snapshot,
            warnings: checks.warnings,
        })
    }

    /// `Ok(None)` while the model server is still unknown.
    fn run_checks(
        &self,
        request: &GenerateRequest,
        selection: &Selection<'_>,
    ) -> Result<Option<Checks>, Error> {
        let Some(server) = selection.server else {
            return Ok(None);
        };
        let mut checks = Checks::default();

        if let Some(instance_type) = selection.instance_type {
            match self.check_server(server, instance_type, selection.custom_instance_type) {
                Some(report) => {
                    self.judge_compat(&report, request.ignore_compat, &mut checks.warnings)?;
                    checks.compatibility = Some(report);
                }
                None => {
                    let needs_accelerator = self
                        .catalog
                        .framework(server)
                        .is_some_and(|fw| fw.accelerator.is_some());
                    if needs_accelerator {
                        let shown = selection.custom_instance_type.unwrap_or(instance_type);
                        let message = format!(
                            "instance type '{}' is not in the catalog; accelerator compatibility for {} was not checked",
                            shown, server
                        );
                        debug!("{}", message);
                        checks.warnings.push(message);
                    }
                }
            }
        }

        if !request.env_overrides.is_empty() {
            let outcome =
                self.validate_env(Some(server), &request.env_overrides, &request.env_options);
            if !outcome.errors.is_empty() {
                return Err(Error::Violations {
                    messages: outcome.errors.iter().map(|e| e.message.clone()).collect(),
                });
            }
            checks.environment = Some(outcome);
        }

        Ok(Some(checks))
    }

    fn judge_compat(
        &self,
        report: &CompatibilityReport,
        ignore: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), Error> {
        if let Some(warning) = &report.result.warning {
            warnings.push(warning.clone());
        }
        if report.result.compatible {
            debug!(
                server = %report.model_server,
                instance = %report.instance_type,
                "accelerator compatible"
            );
            return Ok(());
        }

        let mut message = format!(
            "{} on {}: {}",
            report.model_server,
            report.instance_type,
            report.result.message()
        );
        if !report.recommendations.is_empty() {
            let names = report
                .recommendations
                .iter()
                .map(|r| r.instance_type.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!("; compatible instance types: {}", names));
        }

        if ignore {
            debug!("{}", message);
            warnings.push(message);
            Ok(())
        } else {
            Err(Error::Incompatible(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{FixedPrompter, NoPrompter};
    use mcc_config::snapshot::REDACTED;
    use mcc_config::Value;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn pipeline() -> Pipeline {
        Pipeline::load(None)
            .unwrap()
            .with_seed(7)
            .with_timestamp(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap())
    }

    fn request(dir: &TempDir, options: &[(&str, Value)]) -> GenerateRequest {
        GenerateRequest {
            cli: CliInputs {
                options: options
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                ..CliInputs::default()
            },
            working_dir: dir.path().to_path_buf(),
            ..GenerateRequest::default()
        }
    }

    #[test]
    fn test_generate_traditional_stack() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("churn")),
                (params::FRAMEWORK, json!("sklearn")),
                (params::MODEL_SERVER, json!("flask")),
                (params::MODEL_FORMAT, json!("pkl")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );

        let report = pipeline().generate(&req, &mut NoPrompter).unwrap();
        let config = &report.configuration;
        // a name given as an option does not move the destination
        assert_eq!(config.get_str(params::DESTINATION_DIR), Some("."));
        assert_eq!(config.get_str(params::BUILD_TIMESTAMP), Some("2026-01-02T03:04:05Z"));
        assert!(report.compatibility.is_none());
        assert!(!report.has_soft_findings());
    }

    #[test]
    fn test_generate_positional_name_sets_destination() {
        let dir = TempDir::new().unwrap();
        let mut req = request(
            &dir,
            &[
                (params::FRAMEWORK, json!("sklearn")),
                (params::MODEL_SERVER, json!("flask")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );
        req.cli.positional = Some("churn".to_string());

        let report = pipeline().generate(&req, &mut NoPrompter).unwrap();
        let config = &report.configuration;
        assert_eq!(config.get_str(params::PROJECT_NAME), Some("churn"));
        assert_eq!(config.provenance(params::PROJECT_NAME), Provenance::CliArgument);
        assert_eq!(config.get_str(params::DESTINATION_DIR), Some("./churn"));
        assert_eq!(config.provenance(params::DESTINATION_DIR), Provenance::Derived);
    }

    #[test]
    fn test_defaulted_instance_is_asked_before_checking() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
            ],
        );
        let mut prompter = FixedPrompter::new(
            [(params::INSTANCE_TYPE.to_string(), json!("gpu-enabled"))]
                .into_iter()
                .collect(),
        );

        let report = pipeline().generate(&req, &mut prompter).unwrap();
        assert!(prompter.asked().iter().any(|n| n == params::INSTANCE_TYPE));
        assert_eq!(
            report.configuration.provenance(params::INSTANCE_TYPE),
            Provenance::Prompt
        );
        let compat = report.compatibility.unwrap();
        assert!(compat.result.compatible);
        assert_eq!(compat.instance_type, "ml.g5.xlarge");
    }

    #[test]
    fn test_unanswered_default_instance_still_fails_after_finalize() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
            ],
        );
        let mut prompter = FixedPrompter::default();

        let err = pipeline().generate(&req, &mut prompter).unwrap_err();
        assert!(prompter.asked().iter().any(|n| n == params::INSTANCE_TYPE));
        assert!(matches!(err, Error::Incompatible(_)), "{}", err);
    }

    #[test]
    fn test_prompted_custom_instance_is_checked() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
                (params::INSTANCE_TYPE, json!("custom")),
            ],
        );
        let mut prompter = FixedPrompter::new(
            [(params::CUSTOM_INSTANCE_TYPE.to_string(), json!("ml.g5.12xlarge"))]
                .into_iter()
                .collect(),
        );

        let report = pipeline().generate(&req, &mut prompter).unwrap();
        let compat = report.compatibility.unwrap();
        assert_eq!(compat.instance_type, "ml.g5.12xlarge");
        assert!(compat.result.compatible);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_answer_replaces_unresolved_token() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("ml-container.config.json"),
            r#"{"hfToken": "$HF_TOKEN"}"#,
        )
        .unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
            ],
        );
        let mut prompter = FixedPrompter::new(
            [(params::HF_TOKEN.to_string(), json!("hf_typed"))]
                .into_iter()
                .collect(),
        );

        let report = pipeline().generate(&req, &mut prompter).unwrap();
        assert!(prompter.asked().iter().any(|n| n == params::HF_TOKEN));
        assert_eq!(report.configuration.get_str(params::HF_TOKEN), Some("hf_typed"));
        assert_eq!(
            report.configuration.provenance(params::HF_TOKEN),
            Provenance::Prompt
        );
    }

    #[test]
    fn test_generate_report_redacts_sensitive_values() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
                (params::HF_TOKEN, json!("hf_secret")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );
        let p = pipeline();

        let report = p.generate(&req, &mut NoPrompter).unwrap();
        assert_eq!(report.configuration.get_str(params::HF_TOKEN), Some("hf_secret"));

        let shown = report.redacted(p.matrix());
        assert_eq!(shown.configuration.get_str(params::HF_TOKEN), Some(REDACTED));
        assert_eq!(
            shown.configuration.provenance(params::HF_TOKEN),
            Provenance::CliOption
        );
        assert_eq!(shown.configuration.get_str(params::MODEL_SERVER), Some("vllm"));

        let json = crate::output::render_generate(&shown, mcc_common::OutputFormat::Json).unwrap();
        assert!(!json.contains("hf_secret"));
        let md = crate::output::render_generate(&shown, mcc_common::OutputFormat::Md).unwrap();
        assert!(!md.contains("hf_secret"));
        assert!(md.contains(REDACTED));
    }

    #[test]
    fn test_generate_incompatible_instance_fails() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("djl")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );

        let err = pipeline().generate(&req, &mut NoPrompter).unwrap_err();
        assert!(matches!(err, Error::Incompatible(_)), "{}", err);
        assert!(err.to_string().contains("ml.inf2.xlarge"));
    }

    #[test]
    fn test_generate_ignore_compat_downgrades_to_warning() {
        let dir = TempDir::new().unwrap();
        let mut req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("djl")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );
        req.ignore_compat = true;

        let report = pipeline().generate(&req, &mut NoPrompter).unwrap();
        let compat = report.compatibility.as_ref().unwrap();
        assert!(!compat.result.compatible);
        assert!(!compat.recommendations.is_empty());
        assert!(report.has_soft_findings());
    }

    #[test]
    fn test_server_from_prompt_is_checked_after_finalize() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
            ],
        );
        let mut prompter = FixedPrompter::new(
            [(params::MODEL_SERVER.to_string(), json!("vllm"))]
                .into_iter()
                .collect(),
        );

        let report = pipeline().generate(&req, &mut prompter).unwrap();
        assert!(prompter.asked().iter().any(|n| n == params::MODEL_SERVER));
        assert_eq!(
            report.configuration.provenance(params::MODEL_SERVER),
            Provenance::Prompt
        );
        let compat = report.compatibility.unwrap();
        assert!(compat.result.compatible);
        assert_eq!(compat.instance_type, "ml.g5.xlarge");
    }

    #[test]
    fn test_custom_instance_not_in_catalog_warns() {
        let dir = TempDir::new().unwrap();
        let req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
                (params::INSTANCE_TYPE, json!("custom")),
                (params::CUSTOM_INSTANCE_TYPE, json!("ml.x99.huge")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );

        let report = pipeline().generate(&req, &mut NoPrompter).unwrap();
        assert!(report.compatibility.is_none());
        assert!(report.warnings[0].contains("ml.x99.huge"));
    }

    #[test]
    fn test_env_override_errors_abort() {
        let dir = TempDir::new().unwrap();
        let mut req = request(
            &dir,
            &[
                (params::PROJECT_NAME, json!("llm")),
                (params::FRAMEWORK, json!("transformers")),
                (params::MODEL_SERVER, json!("vllm")),
                (params::INSTANCE_TYPE, json!("gpu-enabled")),
                (params::SKIP_PROMPTS, json!(true)),
            ],
        );
        req.env_overrides
            .insert("MAX_MODEL_LEN".to_string(), "lots".to_string());

        let err = pipeline().generate(&req, &mut NoPrompter).unwrap_err();
        assert!(matches!(err, Error::Violations { .. }), "{}", err);
    }

    #[test]
    fn test_missing_required_without_prompts() {
        let dir = TempDir::new().unwrap();
        let req = request(&dir, &[(params::SKIP_PROMPTS, json!(true))]);

        let err = pipeline().generate(&req, &mut NoPrompter).unwrap_err();
        match err {
            Error::MissingRequired { parameters } => {
                assert!(parameters.contains(&params::FRAMEWORK.to_string()));
                assert!(parameters.contains(&params::MODEL_SERVER.to_string()));
                assert!(!parameters.contains(&params::PROJECT_NAME.to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_report_redacts_and_filters() {
        let dir = TempDir::new().unwrap();
        let cli = CliInputs {
            options: [
                (params::HF_TOKEN.to_string(), json!("hf_secret")),
                (params::FRAMEWORK.to_string(), json!("xgboost")),
            ]
            .into_iter()
            .collect(),
            ..CliInputs::default()
        };
        let p = pipeline();
        let (raw, resolved) = p.resolve(&cli, dir.path(), &EnvSnapshot::default()).unwrap();

        let all = p.resolve_report(&raw, &resolved, false);
        assert_eq!(all.values.get(params::HF_TOKEN), Some(&json!(REDACTED)));
        assert!(all.values.contains_key(params::AWS_REGION));

        let explicit = p.resolve_report(&raw, &resolved, true);
        assert_eq!(explicit.values.len(), 2);
        assert_eq!(explicit.provenance.len(), 2);
        assert_eq!(
            explicit.provenance.get(params::FRAMEWORK),
            Some(&Provenance::CliOption)
        );
    }

    #[test]
    fn test_check_server_skips_cpu_agnostic_servers() {
        let p = pipeline();
        assert!(p.check_server("flask", "gpu-enabled", None).is_none());
        assert!(p.check_server("not-a-server", "gpu-enabled", None).is_none());
        let report = p.check_server("vllm", "cpu-optimized", None).unwrap();
        assert!(!report.result.compatible);
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.family == "cuda"));
    }
}
