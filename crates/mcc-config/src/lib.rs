//! ml-container-creator parameter resolution.
//!
//! This crate provides:
//! - The parameter matrix: per-parameter source permissions, defaults and validators
//! - Source collection (CLI, environment, config documents, package.json section)
//! - Precedence resolution with provenance (`ConfigResolver`)
//! - Prompt merging, derived fields and required-parameter enforcement (`ConfigFinalizer`)
//! - Resolution snapshots for audit output

pub mod derive;
pub mod finalize;
pub mod matrix;
pub mod resolve;
pub mod snapshot;
pub mod source;
pub mod validate;

pub use finalize::{
    ConfigFinalizer, FinalConfiguration, FinalizeError, PromptAnswers, PromptRequest, Violation,
    ViolationKind,
};
pub use matrix::{params, ParameterMatrix, ParameterSpec, Source, ValueKind};
pub use resolve::{ConfigResolver, Provenance, ResolvedConfiguration};
pub use snapshot::ResolutionSnapshot;
pub use source::{
    CliInputs, ConfigDocument, ConfigError, EnvSnapshot, Origin, RawSourceValues, SourceCollector,
};
pub use validate::ValidationContext;

/// Parameter values are JSON values: strings, booleans or string lists.
pub type Value = serde_json::Value;

/// Flat name → value map.
pub type ValueMap = std::collections::BTreeMap<String, Value>;
