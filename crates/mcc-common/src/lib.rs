//! ml-container-creator common types and errors.
//!
//! This crate provides foundational types shared across the mcc crates:
//! - The unified error taxonomy with stable codes
//! - The distinguished structural value error
//! - Output format selection

pub mod error;
pub mod output;

pub use error::{
    format_error_human, Error, ErrorCategory, Result, StructuralError, StructuredError,
};
pub use output::OutputFormat;
