//! ml-container-creator core library.
//!
//! This crate provides:
//! - The generation pipeline tying resolution, compatibility checks and
//!   finalization together
//! - Prompting adapters
//! - Logging setup and exit codes for the `mcc` binary
//! - Output rendering and JSON schema export

pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod schema;

pub use exit_codes::ExitCode;
pub use pipeline::{CompatibilityReport, GenerateReport, GenerateRequest, Pipeline, ResolveReport};
pub use prompt::{DialoguerPrompter, FixedPrompter, NoPrompter, Prompter};
