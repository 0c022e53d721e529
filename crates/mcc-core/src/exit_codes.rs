//! Exit codes for the mcc CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-2: Operational outcomes
//! - 10-19: User/input errors (recoverable by fixing flags or documents)
//! - 20-29: Internal and I/O errors
//! - 30-39: Compatibility errors

use mcc_common::Error;

/// Exit codes for mcc operations. Stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-2)
    // ========================================================================
    /// Success: configuration produced, nothing flagged
    Clean = 0,

    /// Missing required parameters or invalid values
    Violations = 1,

    /// Warnings only, reported as failure because of --strict
    SoftFindings = 2,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Configuration document missing or unreadable
    ConfigError = 11,

    /// A single value cannot be interpreted at all
    StructuralError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,

    // ========================================================================
    // Compatibility (30-39)
    // ========================================================================
    /// Framework accelerator requirements not met, or catalog unusable
    CompatError = 30,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes 0 only.
    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19. These can be resolved by user action.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        (20..30).contains(&self.as_i32())
    }

    pub fn is_error(self) -> bool {
        self != ExitCode::Clean
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::Violations => "ERR_VIOLATIONS",
            ExitCode::SoftFindings => "ERR_SOFT_FINDINGS",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::StructuralError => "ERR_STRUCTURAL",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
            ExitCode::CompatError => "ERR_COMPAT",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::UnknownParameter(_) => ExitCode::ArgsError,
            Error::DocumentNotFound { .. } | Error::DocumentParse { .. } => ExitCode::ConfigError,
            Error::Structural(_) => ExitCode::StructuralError,
            Error::MissingRequired { .. } | Error::Violations { .. } => ExitCode::Violations,
            Error::Incompatible(_) | Error::Catalog(_) => ExitCode::CompatError,
            Error::Prompt(_) | Error::Json(_) => ExitCode::InternalError,
            Error::Io(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
