//! Per-family accelerator version comparators.
//!
//! A comparator decides whether a required version is satisfied by any of
//! the versions an instance provides. GPU toolkits and Neuron SDKs share
//! one rule: the major component must match and the available minor must be
//! at least the required minor. Patch levels are never compared.

use std::fmt;

use tracing::trace;

use crate::result::ValidationResult;
use crate::version::Version;

/// Version check for one accelerator family.
pub trait AcceleratorComparator: fmt::Debug + Send + Sync {
    /// Human-readable family label used in messages.
    fn label(&self) -> &str;

    fn is_compatible(&self, required: &str, available: &[String]) -> ValidationResult;
}

/// Shared major-equal, minor-at-least rule. Returns the first satisfying
/// available version in the order given.
fn major_minor_check(label: &str, required: &str, available: &[String]) -> ValidationResult {
    let wanted: Version = match required.parse() {
        Ok(v) => v,
        Err(err) => {
            return ValidationResult::incompatible(format!(
                "invalid required {} version '{}': {}",
                label, required, err
            ))
        }
    };

    if available.is_empty() {
        return ValidationResult::incompatible(format!(
            "{} {} required but the instance reports no {} versions",
            label, required, label
        ));
    }

    let chosen = available.iter().find(|candidate| match candidate.parse::<Version>() {
        Ok(version) => version.satisfies_major_minor(&wanted),
        Err(err) => {
            trace!(family = label, version = %candidate, error = %err, "skipping unparseable version");
            false
        }
    });

    match chosen {
        Some(version) => ValidationResult::info(format!(
            "{} {} satisfied by available version {}",
            label, required, version
        )),
        None => ValidationResult::incompatible(format!(
            "{} {} required but available versions [{}] provide no {}.x release at or above {}.{}",
            label,
            required,
            available.join(", "),
            wanted.major(),
            wanted.major(),
            wanted.minor()
        )),
    }
}

/// NVIDIA CUDA toolkit, compared as `major.minor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CudaComparator;

impl AcceleratorComparator for CudaComparator {
    fn label(&self) -> &str {
        "CUDA"
    }

    fn is_compatible(&self, required: &str, available: &[String]) -> ValidationResult {
        major_minor_check(self.label(), required, available)
    }
}

/// AWS Neuron SDK, written `major.minor.patch`; the patch is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuronComparator;

impl AcceleratorComparator for NeuronComparator {
    fn label(&self) -> &str {
        "Neuron SDK"
    }

    fn is_compatible(&self, required: &str, available: &[String]) -> ValidationResult {
        major_minor_check(self.label(), required, available)
    }
}

/// AMD ROCm, compared as `major.minor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RocmComparator;

impl AcceleratorComparator for RocmComparator {
    fn label(&self) -> &str {
        "ROCm"
    }

    fn is_compatible(&self, required: &str, available: &[String]) -> ValidationResult {
        major_minor_check(self.label(), required, available)
    }
}

/// No accelerator. Always compatible; versions are never consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuComparator;

impl AcceleratorComparator for CpuComparator {
    fn label(&self) -> &str {
        "CPU"
    }

    fn is_compatible(&self, _required: &str, _available: &[String]) -> ValidationResult {
        ValidationResult::info("CPU-only workload; no accelerator version check needed")
    }
}
