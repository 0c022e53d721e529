//! Environment-variable override validation.
//!
//! Strategies run independently and their findings are concatenated:
//! - `known-flags`: deprecation, type and bounds checks for variables the
//!   serving framework declares. Unknown variables are not reported.
//! - `community-reports`: advisory warnings from curated reports.
//! - `introspection`: placeholder for execution-based checks; only warns.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Declared value type of an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvVarKind {
    Integer,
    Float,
    String,
    Boolean,
}

impl fmt::Display for EnvVarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvVarKind::Integer => write!(f, "integer"),
            EnvVarKind::Float => write!(f, "float"),
            EnvVarKind::String => write!(f, "string"),
            EnvVarKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// What a serving framework declares about one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnvVarSpec {
    pub kind: EnvVarKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnvVarSpec {
    pub fn new(kind: EnvVarKind) -> Self {
        EnvVarSpec {
            kind,
            min: None,
            max: None,
            deprecated: false,
            replacement: None,
            description: None,
        }
    }

    pub fn bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn deprecated(mut self, replacement: Option<&str>) -> Self {
        self.deprecated = true;
        self.replacement = replacement.map(str::to_string);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Valid,
    Invalid,
    Deprecated,
}

/// Externally curated observation about a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommunityReport {
    pub variable: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Validation strategy identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    KnownFlags,
    CommunityReports,
    Introspection,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::KnownFlags => "known-flags",
            Strategy::CommunityReports => "community-reports",
            Strategy::Introspection => "introspection",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One problem found with a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnvVarFinding {
    pub variable: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<CommunityReport>,
}

impl EnvVarFinding {
    fn error(variable: &str, message: String) -> Self {
        EnvVarFinding {
            variable: variable.to_string(),
            message,
            severity: Severity::Error,
            replacement: None,
            reports: Vec::new(),
        }
    }

    fn warning(variable: &str, message: String) -> Self {
        EnvVarFinding {
            severity: Severity::Warning,
            ..Self::error(variable, message)
        }
    }
}

/// Which strategies run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarOptions {
    /// `false` skips validation entirely.
    pub enabled: bool,
    pub known_flags: bool,
    pub community_reports: bool,
    pub introspection: bool,
}

impl Default for EnvVarOptions {
    fn default() -> Self {
        EnvVarOptions {
            enabled: true,
            known_flags: true,
            community_reports: true,
            introspection: false,
        }
    }
}

impl EnvVarOptions {
    pub fn disabled() -> Self {
        EnvVarOptions {
            enabled: false,
            ..Self::default()
        }
    }
}

/// `{errors, warnings, strategiesUsed}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnvVarValidation {
    pub errors: Vec<EnvVarFinding>,
    pub warnings: Vec<EnvVarFinding>,
    pub strategies_used: Vec<Strategy>,
}

impl EnvVarValidation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn push(&mut self, finding: EnvVarFinding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }
}

/// Validates variable overrides against a framework's declared specs.
#[derive(Debug, Clone, Default)]
pub struct EnvVarValidator {
    reports: Vec<CommunityReport>,
}

impl EnvVarValidator {
    pub fn new(reports: Vec<CommunityReport>) -> Self {
        EnvVarValidator { reports }
    }

    pub fn validate(
        &self,
        env: &BTreeMap<String, String>,
        specs: &BTreeMap<String, EnvVarSpec>,
        options: &EnvVarOptions,
    ) -> EnvVarValidation {
        let mut outcome = EnvVarValidation::default();
        if !options.enabled {
            debug!("environment validation disabled");
            return outcome;
        }

        if options.known_flags {
            outcome.strategies_used.push(Strategy::KnownFlags);
            for (name, value) in env {
                if let Some(spec) = specs.get(name) {
                    for finding in check_known_flag(name, value, spec) {
                        outcome.push(finding);
                    }
                }
            }
        }

        if options.community_reports {
            outcome.strategies_used.push(Strategy::CommunityReports);
            for name in env.keys() {
                if let Some(finding) = self.check_reports(name) {
                    outcome.push(finding);
                }
            }
        }

        if options.introspection {
            outcome.strategies_used.push(Strategy::Introspection);
            outcome.push(EnvVarFinding::warning(
                "*",
                "introspection validation is experimental and has not been tested in automated pipelines; no values were inspected".to_string(),
            ));
        }

        debug!(
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "environment validation finished"
        );
        outcome
    }

    fn check_reports(&self, name: &str) -> Option<EnvVarFinding> {
        let flagged: Vec<CommunityReport> = self
            .reports
            .iter()
            .filter(|r| r.variable == name && r.status != ReportStatus::Valid)
            .cloned()
            .collect();
        if flagged.is_empty() {
            return None;
        }

        let summary = flagged
            .iter()
            .map(|r| match &r.source {
                Some(source) => format!("{} ({}): {}", status_label(r.status), source, r.note),
                None => format!("{}: {}", status_label(r.status), r.note),
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(EnvVarFinding {
            reports: flagged,
            ..EnvVarFinding::warning(name, format!("{} has community reports: {}", name, summary))
        })
    }
}

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Valid => "valid",
        ReportStatus::Invalid => "invalid",
        ReportStatus::Deprecated => "deprecated",
    }
}

/// Deprecation, type and bounds checks; all three are reported.
fn check_known_flag(name: &str, value: &str, spec: &EnvVarSpec) -> Vec<EnvVarFinding> {
    let mut findings = Vec::new();

    if spec.deprecated {
        let message = match &spec.replacement {
            Some(replacement) => format!("{} is deprecated; use {} instead", name, replacement),
            None => format!("{} is deprecated", name),
        };
        findings.push(EnvVarFinding {
            replacement: spec.replacement.clone(),
            ..EnvVarFinding::warning(name, message)
        });
    }

    let trimmed = value.trim();
    let numeric = match spec.kind {
        EnvVarKind::Integer => trimmed.parse::<i64>().ok().map(|n| n as f64),
        EnvVarKind::Float => trimmed.parse::<f64>().ok().filter(|f| f.is_finite()),
        EnvVarKind::Boolean | EnvVarKind::String => None,
    };

    let type_ok = match spec.kind {
        EnvVarKind::Integer | EnvVarKind::Float => numeric.is_some(),
        EnvVarKind::Boolean => matches!(
            trimmed.to_ascii_lowercase().as_str(),
            "true" | "false" | "1" | "0"
        ),
        EnvVarKind::String => true,
    };
    if !type_ok {
        findings.push(EnvVarFinding::error(
            name,
            format!("{} must be of type {}, got '{}'", name, spec.kind, value),
        ));
    }

    if let Some(number) = numeric {
        let below = spec.min.is_some_and(|min| number < min);
        let above = spec.max.is_some_and(|max| number > max);
        if below || above {
            findings.push(EnvVarFinding::error(
                name,
                format!(
                    "{} = {} is outside the allowed range [{}, {}]",
                    name,
                    trimmed,
                    spec.min.map_or("-inf".to_string(), |m| m.to_string()),
                    spec.max.map_or("inf".to_string(), |m| m.to_string())
                ),
            ));
        }
    }

    findings
}
