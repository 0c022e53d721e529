//! Outcome of a single compatibility check.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Exactly one of `error`, `warning` or `info` is set. An incompatible
/// result always carries an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub compatible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ValidationResult {
    /// Compatible, with an informational note.
    pub fn info(message: impl Into<String>) -> Self {
        ValidationResult {
            compatible: true,
            error: None,
            warning: None,
            info: Some(message.into()),
        }
    }

    /// Compatible, but something deserves attention.
    pub fn warning(message: impl Into<String>) -> Self {
        ValidationResult {
            compatible: true,
            error: None,
            warning: Some(message.into()),
            info: None,
        }
    }

    pub fn incompatible(message: impl Into<String>) -> Self {
        ValidationResult {
            compatible: false,
            error: Some(message.into()),
            warning: None,
            info: None,
        }
    }

    /// The populated message, whichever kind it is.
    pub fn message(&self) -> &str {
        self.error
            .as_deref()
            .or(self.warning.as_deref())
            .or(self.info.as_deref())
            .unwrap_or("")
    }
}
