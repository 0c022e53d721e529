//! Resolution snapshots for auditing a run.
//!
//! A snapshot records which documents were read and which source won for
//! each parameter, so a generated project can be traced back to its inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::matrix::ParameterMatrix;
use crate::resolve::{Provenance, ResolvedConfiguration};
use crate::source::{compute_sha256, DocumentInfo, RawSourceValues};
use crate::{Value, ValueMap};

/// Placeholder written instead of sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Replace the values of `sensitive` parameters with [`REDACTED`].
pub fn redact(matrix: &ParameterMatrix, values: ValueMap) -> ValueMap {
    values
        .into_iter()
        .map(|(name, value)| {
            if matrix.get(&name).is_some_and(|spec| spec.sensitive) {
                (name, Value::String(REDACTED.to_string()))
            } else {
                (name, value)
            }
        })
        .collect()
}

/// A frozen record of one resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolutionSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Run identifier from the logging span.
    #[serde(default)]
    pub run_id: Option<String>,

    /// Documents that contributed raw values.
    pub documents: Vec<DocumentInfo>,

    /// Combined hash of all document hashes (for quick comparison).
    pub combined_hash: String,

    /// Winning source per parameter.
    pub provenance: BTreeMap<String, Provenance>,

    /// Explicitly supplied values, sensitive ones redacted.
    pub explicit: ValueMap,
}

impl ResolutionSnapshot {
    pub fn new(
        matrix: &ParameterMatrix,
        raw: &RawSourceValues,
        resolved: &ResolvedConfiguration,
        run_id: Option<String>,
    ) -> Self {
        let combined = raw
            .documents
            .iter()
            .map(|doc| doc.hash.as_str())
            .collect::<Vec<_>>()
            .join(":");

        let explicit = redact(matrix, resolved.explicit_only());

        ResolutionSnapshot {
            timestamp: Utc::now(),
            run_id,
            documents: raw.documents.clone(),
            combined_hash: compute_sha256(if combined.is_empty() { "none" } else { &combined }),
            provenance: resolved.provenance_map().clone(),
            explicit,
        }
    }

    /// Names of parameters that fell back to a default.
    pub fn defaulted(&self) -> Vec<&str> {
        self.provenance
            .iter()
            .filter(|(_, p)| **p == Provenance::Default)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
