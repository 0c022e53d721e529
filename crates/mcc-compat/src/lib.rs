//! ml-container-creator compatibility validation.
//!
//! This crate provides:
//! - Accelerator version parsing and per-family comparators
//! - A runtime-extensible comparator registry
//! - Framework-vs-instance compatibility checks and instance recommendations
//! - Environment-variable validation strategies
//! - The catalog of serving frameworks, instance profiles and community reports

pub mod catalog;
pub mod comparator;
pub mod envvar;
pub mod registry;
pub mod result;
pub mod validator;
pub mod version;

pub use catalog::{Catalog, CatalogError, FrameworkProfile, InstanceProfile};
pub use comparator::{
    AcceleratorComparator, CpuComparator, CudaComparator, NeuronComparator, RocmComparator,
};
pub use envvar::{
    CommunityReport, EnvVarFinding, EnvVarKind, EnvVarOptions, EnvVarSpec, EnvVarValidation,
    EnvVarValidator, ReportStatus, Severity, Strategy,
};
pub use registry::ComparatorRegistry;
pub use result::ValidationResult;
pub use validator::{
    AcceleratorCapability, AcceleratorRequirement, CompatibilityValidator, InstanceRecommendation,
};
pub use version::{Version, VersionError};
