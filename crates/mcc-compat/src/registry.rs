//! Family name → comparator lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::comparator::{
    AcceleratorComparator, CpuComparator, CudaComparator, NeuronComparator, RocmComparator,
};

/// Family names of the built-in comparators.
pub mod families {
    pub const CUDA: &str = "cuda";
    pub const NEURON: &str = "neuron";
    pub const ROCM: &str = "rocm";
    pub const CPU: &str = "cpu";
}

/// Registered comparators keyed by lowercase family name.
///
/// New families are added with [`register_comparator`](Self::register_comparator);
/// existing comparators are never consulted for families they do not own.
#[derive(Debug, Clone, Default)]
pub struct ComparatorRegistry {
    comparators: BTreeMap<String, Arc<dyn AcceleratorComparator>>,
}

impl ComparatorRegistry {
    /// A registry with no comparators.
    pub fn empty() -> Self {
        Self::default()
    }

    /// CUDA, Neuron, ROCm and CPU.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_comparator(families::CUDA, CudaComparator);
        registry.register_comparator(families::NEURON, NeuronComparator);
        registry.register_comparator(families::ROCM, RocmComparator);
        registry.register_comparator(families::CPU, CpuComparator);
        registry
    }

    /// Add or replace the comparator for `family`.
    pub fn register_comparator<C>(&mut self, family: &str, comparator: C)
    where
        C: AcceleratorComparator + 'static,
    {
        let key = normalize(family);
        debug!(family = %key, label = comparator.label(), "registered comparator");
        self.comparators.insert(key, Arc::new(comparator));
    }

    pub fn get(&self, family: &str) -> Option<&dyn AcceleratorComparator> {
        self.comparators.get(&normalize(family)).map(|c| c.as_ref())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.comparators.contains_key(&normalize(family))
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.comparators.keys().map(String::as_str)
    }
}

fn normalize(family: &str) -> String {
    family.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ValidationResult;

    #[derive(Debug)]
    struct GaudiComparator;

    impl AcceleratorComparator for GaudiComparator {
        fn label(&self) -> &str {
            "Gaudi"
        }

        fn is_compatible(&self, required: &str, available: &[String]) -> ValidationResult {
            if available.iter().any(|v| v == required) {
                ValidationResult::info("exact match")
            } else {
                ValidationResult::incompatible("no exact match")
            }
        }
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ComparatorRegistry::with_defaults();
        let families: Vec<_> = registry.families().collect();
        assert_eq!(families, vec!["cpu", "cuda", "neuron", "rocm"]);
        assert_eq!(registry.get("CUDA").map(|c| c.label()), Some("CUDA"));
    }

    #[test]
    fn test_register_new_family() {
        let mut registry = ComparatorRegistry::with_defaults();
        assert!(!registry.contains("gaudi"));

        registry.register_comparator("Gaudi", GaudiComparator);
        let comparator = registry.get("gaudi").unwrap();
        assert!(comparator.is_compatible("1.16", &["1.16".to_string()]).compatible);
        assert_eq!(registry.get("cuda").map(|c| c.label()), Some("CUDA"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ComparatorRegistry::with_defaults();
        registry.register_comparator("cpu", GaudiComparator);
        assert_eq!(registry.get("cpu").map(|c| c.label()), Some("Gaudi"));
    }
}
