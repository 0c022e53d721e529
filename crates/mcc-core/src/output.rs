//! Payload rendering for stdout and error rendering for stderr.
//!
//! JSON is the contract for automation. Markdown and summary output are for
//! people and may change between releases.

use std::fmt::Write as _;

use mcc_common::{format_error_human, Error, OutputFormat, StructuredError};
use mcc_compat::{AcceleratorRequirement, EnvVarValidation, InstanceRecommendation, ValidationResult};
use mcc_config::matrix::ParameterInfo;
use mcc_config::{Provenance, Value};
use serde::Serialize;

use crate::pipeline::{GenerateReport, ResolveReport};

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Inline rendering of a parameter value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

pub fn render_generate(report: &GenerateReport, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Summary => {
            let config = &report.configuration;
            Ok(format!(
                "{} {}/{} on {} -> {} ({} warning(s))",
                config.get_str(mcc_config::params::PROJECT_NAME).unwrap_or("?"),
                config.get_str(mcc_config::params::FRAMEWORK).unwrap_or("?"),
                config.get_str(mcc_config::params::MODEL_SERVER).unwrap_or("?"),
                config.get_str(mcc_config::params::INSTANCE_TYPE).unwrap_or("?"),
                config.get_str(mcc_config::params::DESTINATION_DIR).unwrap_or("?"),
                report.warnings.len()
                    + report.environment.as_ref().map_or(0, |env| env.warnings.len()),
            ))
        }
        OutputFormat::Md => {
            let mut out = String::new();
            let _ = writeln!(out, "# Project Configuration\n");
            if let Some(run_id) = &report.run_id {
                let _ = writeln!(out, "Run: {}\n", run_id);
            }
            let config = &report.configuration;
            out.push_str(&value_table(
                config
                    .values()
                    .iter()
                    .map(|(name, value)| (name.as_str(), value, config.provenance(name))),
            ));

            if let Some(compat) = &report.compatibility {
                let _ = writeln!(out, "\n## Accelerator Compatibility\n");
                let _ = writeln!(
                    out,
                    "{} needs {} {}; {} provides {}.\n",
                    compat.model_server,
                    compat.requirement.family,
                    compat.requirement.version,
                    compat.instance_type,
                    compat.capability.family
                );
                out.push_str(&validation_md(&compat.result));
            }
            if let Some(env) = &report.environment {
                let _ = writeln!(out, "\n## Environment Variables\n");
                out.push_str(&env_md(env));
            }
            if !report.warnings.is_empty() {
                let _ = writeln!(out, "\n## Warnings\n");
                for warning in &report.warnings {
                    let _ = writeln!(out, "- {}", warning);
                }
            }
            Ok(out)
        }
    }
}

pub fn render_resolve(report: &ResolveReport, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Summary => {
            let explicit = report.provenance.values().filter(|p| p.is_explicit()).count();
            Ok(format!(
                "{} parameter(s), {} explicit, {} document(s)",
                report.values.len(),
                explicit,
                report.documents.len()
            ))
        }
        OutputFormat::Md => {
            let mut out = String::from("# Resolved Configuration\n\n");
            out.push_str(&value_table(report.values.iter().map(|(name, value)| {
                let provenance = report
                    .provenance
                    .get(name)
                    .copied()
                    .unwrap_or(Provenance::Unset);
                (name.as_str(), value, provenance)
            })));
            if !report.documents.is_empty() {
                out.push_str("\n## Documents\n\n");
                for doc in &report.documents {
                    let _ = writeln!(out, "- {} `{}` ({})", doc.origin, doc.path.display(), &doc.hash[..doc.hash.len().min(12)]);
                }
            }
            Ok(out)
        }
    }
}

pub fn render_params(params: &[ParameterInfo], format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(params),
        OutputFormat::Summary => Ok(format!(
            "{} parameter(s), {} required",
            params.len(),
            params.iter().filter(|p| p.required).count()
        )),
        OutputFormat::Md => {
            let mut out = String::from("# Parameters\n\n");
            out.push_str("| Name | Flag | Env | Default | Required | Prompt |\n");
            out.push_str("|------|------|-----|---------|----------|--------|\n");
            for p in params {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} |",
                    p.name,
                    p.cli_flag.as_deref().unwrap_or("-"),
                    p.env_var.as_deref().unwrap_or("-"),
                    p.default.as_ref().map(display_value).unwrap_or_else(|| "-".into()),
                    if p.required { "yes" } else { "no" },
                    if p.promptable { "yes" } else { "no" },
                );
            }
            Ok(out)
        }
    }
}

pub fn render_validation(result: &ValidationResult, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Summary => Ok(format!(
            "{}: {}",
            if result.compatible { "compatible" } else { "incompatible" },
            result.message()
        )),
        OutputFormat::Md => Ok(format!("# Compatibility\n\n{}", validation_md(result))),
    }
}

pub fn render_recommendations(
    requirement: &AcceleratorRequirement,
    recommendations: &[InstanceRecommendation],
    format: OutputFormat,
) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(recommendations),
        OutputFormat::Summary => Ok(format!(
            "{} instance type(s) support {} {}",
            recommendations.len(),
            requirement.family,
            requirement.version
        )),
        OutputFormat::Md => {
            let mut out = format!(
                "# Instances for {} {}\n\n",
                requirement.family, requirement.version
            );
            if recommendations.is_empty() {
                out.push_str("No compatible instance types in the catalog.\n");
            }
            for rec in recommendations {
                let _ = writeln!(
                    out,
                    "- `{}` ({}: {})",
                    rec.instance_type,
                    rec.family,
                    rec.available_versions.join(", ")
                );
            }
            Ok(out)
        }
    }
}

pub fn render_env(result: &EnvVarValidation, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Summary => Ok(format!(
            "{} error(s), {} warning(s)",
            result.errors.len(),
            result.warnings.len()
        )),
        OutputFormat::Md => Ok(format!("# Environment Variables\n\n{}", env_md(result))),
    }
}

/// Error rendering for stderr: structured JSON or the human block.
pub fn render_error(err: &Error, format: OutputFormat, use_color: bool) -> String {
    match format {
        OutputFormat::Json => StructuredError::from(err).to_json(),
        OutputFormat::Summary => format!("error {}: {}", err.code(), err),
        OutputFormat::Md => format_error_human(err, use_color),
    }
}

fn value_table<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value, Provenance)>,
{
    let mut out = String::from("| Parameter | Value | Source |\n|-----------|-------|--------|\n");
    for (name, value, provenance) in rows {
        let _ = writeln!(out, "| {} | {} | {} |", name, display_value(value), provenance);
    }
    out
}

fn validation_md(result: &ValidationResult) -> String {
    let status = if result.compatible { "Compatible" } else { "Incompatible" };
    let message = result.message();
    if message.is_empty() {
        format!("**{}**\n", status)
    } else {
        format!("**{}**: {}\n", status, message)
    }
}

fn env_md(result: &EnvVarValidation) -> String {
    let mut out = String::new();
    let strategies = result
        .strategies_used
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Strategies: {}\n", if strategies.is_empty() { "none" } else { &strategies });
    for finding in &result.errors {
        let _ = writeln!(out, "- **error** `{}`: {}", finding.variable, finding.message);
    }
    for finding in &result.warnings {
        let _ = writeln!(out, "- warning `{}`: {}", finding.variable, finding.message);
    }
    if result.is_clean() {
        out.push_str("No findings.\n");
    }
    out
}
