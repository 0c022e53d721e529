//! Framework-vs-instance accelerator compatibility.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::ComparatorRegistry;
use crate::result::ValidationResult;

/// Accelerator a serving framework needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AcceleratorRequirement {
    pub family: String,
    pub version: String,
}

impl AcceleratorRequirement {
    pub fn new(family: impl Into<String>, version: impl Into<String>) -> Self {
        AcceleratorRequirement {
            family: family.into(),
            version: version.into(),
        }
    }
}

/// Accelerator an instance profile provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AcceleratorCapability {
    pub family: String,

    /// Ordered; comparators pick the first satisfying entry.
    #[serde(default)]
    pub available_versions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
}

impl AcceleratorCapability {
    pub fn new<I, S>(family: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let available_versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        AcceleratorCapability {
            family: family.into(),
            default_version: available_versions.last().cloned(),
            available_versions,
        }
    }
}

/// A compatible instance type found by a recommendation scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceRecommendation {
    pub instance_type: String,
    pub family: String,
    pub available_versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Checks accelerator requirements against capabilities.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityValidator {
    registry: ComparatorRegistry,
}

impl CompatibilityValidator {
    pub fn new(registry: ComparatorRegistry) -> Self {
        CompatibilityValidator { registry }
    }

    /// A validator over the built-in comparators.
    pub fn with_defaults() -> Self {
        Self::new(ComparatorRegistry::with_defaults())
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComparatorRegistry {
        &mut self.registry
    }

    /// Family match first, then a version check by the family's comparator.
    ///
    /// An unregistered family is treated as compatible with a warning.
    pub fn check_compatibility(
        &self,
        requirement: &AcceleratorRequirement,
        capability: &AcceleratorCapability,
    ) -> ValidationResult {
        if !requirement.family.eq_ignore_ascii_case(&capability.family) {
            return ValidationResult::incompatible(format!(
                "framework requires {} accelerators but the instance provides {}; choose an instance type with {} hardware",
                requirement.family, capability.family, requirement.family
            ));
        }

        let Some(comparator) = self.registry.get(&requirement.family) else {
            debug!(family = %requirement.family, "no comparator registered; failing open");
            return ValidationResult::warning(format!(
                "no version comparator registered for accelerator family '{}'; version {} was not checked",
                requirement.family, requirement.version
            ));
        };

        let result = comparator.is_compatible(&requirement.version, &capability.available_versions);
        debug!(
            family = %requirement.family,
            required = %requirement.version,
            compatible = result.compatible,
            "accelerator version check"
        );
        result
    }

    /// Every compatible entry of `capabilities`, in iteration order.
    pub fn get_recommended_instance_types<'a, I>(
        &self,
        requirement: &AcceleratorRequirement,
        capabilities: I,
    ) -> Vec<InstanceRecommendation>
    where
        I: IntoIterator<Item = (&'a str, &'a AcceleratorCapability)>,
    {
        capabilities
            .into_iter()
            .filter_map(|(instance_type, capability)| {
                let result = self.check_compatibility(requirement, capability);
                result.compatible.then(|| InstanceRecommendation {
                    instance_type: instance_type.to_string(),
                    family: capability.family.clone(),
                    available_versions: capability.available_versions.clone(),
                    message: result.info.or(result.warning),
                })
            })
            .collect()
    }
}
