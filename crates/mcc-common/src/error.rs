//! Error types for ml-container-creator.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//!
//! # Taxonomy
//!
//! Ignored inputs never become errors. Soft findings (warnings) and hard
//! validation findings are reported inside result objects, not through this
//! type. What remains here are failures that stop a command outright:
//! unreadable configuration documents, structurally malformed values,
//! missing required parameters and I/O problems.
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Malformed Value
//!   Reason: awsRoleArn: 'arn:aws:s3:::bucket' is not an IAM role ARN
//!   Fix: Pass a role ARN of the form arn:aws:iam::<account>:role/<name>.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mcc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration documents and parameter lookup.
    Config,
    /// Parameter value validation.
    Validation,
    /// Accelerator and catalog compatibility.
    Compatibility,
    /// Interactive prompting.
    Interaction,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Compatibility => write!(f, "compatibility"),
            ErrorCategory::Interaction => write!(f, "interaction"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// A single value shaped so wrongly that it cannot be used at all.
///
/// Raised immediately instead of being collected with other violations.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{parameter}: '{value}' {reason}")]
pub struct StructuralError {
    /// Parameter whose value is malformed.
    pub parameter: String,
    /// The offending value, as supplied.
    pub value: String,
    /// Why the value is unusable.
    pub reason: String,
}

impl StructuralError {
    pub fn new(
        parameter: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StructuralError {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Unified error type for ml-container-creator.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("invalid configuration document {}: {message}", path.display())]
    DocumentParse { path: PathBuf, message: String },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    // Validation errors (20-29)
    #[error("malformed value: {0}")]
    Structural(#[from] StructuralError),

    #[error("missing required parameters: {}", parameters.join(", "))]
    MissingRequired { parameters: Vec<String> },

    #[error("invalid configuration: {}", messages.join("; "))]
    Violations { messages: Vec<String> },

    // Compatibility errors (30-39)
    #[error("accelerator incompatible: {0}")]
    Incompatible(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    // Interaction errors (40-49)
    #[error("prompt failed: {0}")]
    Prompt(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Validation errors
    /// - 30-39: Compatibility errors
    /// - 40-49: Interaction errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::DocumentNotFound { .. } => 11,
            Error::DocumentParse { .. } => 12,
            Error::UnknownParameter(_) => 13,
            Error::Structural(_) => 20,
            Error::MissingRequired { .. } => 21,
            Error::Violations { .. } => 22,
            Error::Incompatible(_) => 30,
            Error::Catalog(_) => 31,
            Error::Prompt(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::DocumentNotFound { .. }
            | Error::DocumentParse { .. }
            | Error::UnknownParameter(_) => ErrorCategory::Config,

            Error::Structural(_) | Error::MissingRequired { .. } | Error::Violations { .. } => {
                ErrorCategory::Validation
            }

            Error::Incompatible(_) | Error::Catalog(_) => ErrorCategory::Compatibility,

            Error::Prompt(_) => ErrorCategory::Interaction,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the flags and configuration documents passed to mcc.",
            Error::DocumentNotFound { .. } => {
                "Check the path given via --config or ML_CONTAINER_CREATOR_CONFIG."
            }
            Error::DocumentParse { .. } => {
                "Configuration documents must contain a single object of parameter names to values."
            }
            Error::UnknownParameter(_) => "Run 'mcc params' to list the recognized parameters.",
            Error::Structural(_) => "Correct the value; it cannot be interpreted at all.",
            Error::MissingRequired { .. } => {
                "Supply the listed parameters via flags, a config document, or run without --skip-prompts."
            }
            Error::Violations { .. } => "Fix the listed parameter values and re-run.",
            Error::Incompatible(_) => {
                "Pick an instance type whose accelerator satisfies the framework, or pass --ignore-compat."
            }
            Error::Catalog(_) => "Check the catalog passed via --catalog or MCC_CATALOG.",
            Error::Prompt(_) => "Re-run with --skip-prompts and supply values as flags.",
            Error::Io(_) => "Check file permissions and that the referenced paths exist.",
            Error::Json(_) => "Check the JSON syntax of the referenced file.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::DocumentNotFound { .. } => "Configuration Document Not Found",
            Error::DocumentParse { .. } => "Invalid Configuration Document",
            Error::UnknownParameter(_) => "Unknown Parameter",
            Error::Structural(_) => "Malformed Value",
            Error::MissingRequired { .. } => "Missing Required Parameters",
            Error::Violations { .. } => "Invalid Configuration",
            Error::Incompatible(_) => "Incompatible Accelerator",
            Error::Catalog(_) => "Catalog Error",
            Error::Prompt(_) => "Prompt Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context (e.g., parameter names, paths).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();

        match err {
            Error::DocumentNotFound { path } | Error::DocumentParse { path, .. } => {
                context.insert(
                    "path".to_string(),
                    serde_json::json!(path.display().to_string()),
                );
            }
            Error::Structural(inner) => {
                context.insert("parameter".to_string(), serde_json::json!(inner.parameter));
            }
            Error::MissingRequired { parameters } => {
                context.insert("parameters".to_string(), serde_json::json!(parameters));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(
            Error::MissingRequired {
                parameters: vec!["framework".into()]
            }
            .code(),
            21
        );
        assert_eq!(Error::Incompatible("cuda".into()).code(), 30);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        let structural = StructuralError::new("awsRoleArn", "nope", "is not an IAM role ARN");
        assert_eq!(
            Error::from(structural).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            Error::Catalog("missing".into()).category(),
            ErrorCategory::Compatibility
        );
    }

    #[test]
    fn test_structural_error_display() {
        let err = StructuralError::new("awsRoleArn", "arn:aws:s3:::bucket", "is not an IAM role ARN");
        assert_eq!(
            err.to_string(),
            "awsRoleArn: 'arn:aws:s3:::bucket' is not an IAM role ARN"
        );
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::MissingRequired {
            parameters: vec!["framework".into(), "modelServer".into()],
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 21);
        assert_eq!(structured.category, ErrorCategory::Validation);
        assert_eq!(
            structured.context.get("parameters"),
            Some(&serde_json::json!(["framework", "modelServer"]))
        );
        assert!(structured.to_json().contains(r#""category":"validation""#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::UnknownParameter("frameworkk".into());
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Unknown Parameter"));
        assert!(formatted.contains("unknown parameter: frameworkk"));
        assert!(formatted.contains("mcc params"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::Compatibility.to_string(), "compatibility");
    }
}
