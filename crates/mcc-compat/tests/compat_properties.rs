//! Property-based tests for comparator and validator laws.

use mcc_compat::{
    AcceleratorCapability, AcceleratorComparator, AcceleratorRequirement, CompatibilityValidator,
    CpuComparator, CudaComparator, EnvVarOptions, EnvVarSpec, EnvVarKind, EnvVarValidation,
    EnvVarValidator, NeuronComparator,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn two_part() -> impl Strategy<Value = (u64, u64)> {
    (0u64..20, 0u64..20)
}

fn three_part() -> impl Strategy<Value = (u64, u64, u64)> {
    (0u64..5, 0u64..30, 0u64..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    /// CUDA: compatible iff some available version has equal major and minor >= required.
    #[test]
    fn cuda_matches_major_minor_rule(
        required in two_part(),
        available in prop::collection::vec(two_part(), 0..6),
    ) {
        let required_str = format!("{}.{}", required.0, required.1);
        let available_str: Vec<String> =
            available.iter().map(|(ma, mi)| format!("{}.{}", ma, mi)).collect();

        let expected = available
            .iter()
            .any(|(ma, mi)| *ma == required.0 && *mi >= required.1);
        let result = CudaComparator.is_compatible(&required_str, &available_str);

        prop_assert_eq!(result.compatible, expected);
        if !result.compatible {
            prop_assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
        }
    }

    /// Neuron: patch components never affect the outcome.
    #[test]
    fn neuron_ignores_patch(
        required in three_part(),
        available in prop::collection::vec(three_part(), 1..6),
        patch_shift in 0u64..100,
    ) {
        let required_str = format!("{}.{}.{}", required.0, required.1, required.2);
        let shifted_str = format!("{}.{}.{}", required.0, required.1, required.2 + patch_shift);
        let available_str: Vec<String> = available
            .iter()
            .map(|(ma, mi, pa)| format!("{}.{}.{}", ma, mi, pa))
            .collect();

        let a = NeuronComparator.is_compatible(&required_str, &available_str);
        let b = NeuronComparator.is_compatible(&shifted_str, &available_str);
        prop_assert_eq!(a.compatible, b.compatible);
    }

    /// CPU: always compatible.
    #[test]
    fn cpu_always_compatible(required in ".*", available in prop::collection::vec(".*", 0..4)) {
        prop_assert!(CpuComparator.is_compatible(&required, &available).compatible);
    }

    /// Recommendations are exactly the compatible capabilities, in input order.
    #[test]
    fn recommendations_are_filtered_subsequence(
        required in two_part(),
        instances in prop::collection::vec(prop::collection::vec(two_part(), 0..4), 0..8),
    ) {
        let validator = CompatibilityValidator::with_defaults();
        let requirement = AcceleratorRequirement::new("cuda", format!("{}.{}", required.0, required.1));
        let capabilities: Vec<(String, AcceleratorCapability)> = instances
            .iter()
            .enumerate()
            .map(|(idx, versions)| {
                let versions = versions.iter().map(|(ma, mi)| format!("{}.{}", ma, mi));
                (format!("ml.test{}.xlarge", idx), AcceleratorCapability::new("cuda", versions))
            })
            .collect();

        let recommended = validator.get_recommended_instance_types(
            &requirement,
            capabilities.iter().map(|(name, cap)| (name.as_str(), cap)),
        );
        let expected: Vec<&str> = capabilities
            .iter()
            .filter(|(_, cap)| validator.check_compatibility(&requirement, cap).compatible)
            .map(|(name, _)| name.as_str())
            .collect();
        let actual: Vec<&str> = recommended.iter().map(|r| r.instance_type.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Disabled validation is empty whatever the input.
    #[test]
    fn disabled_env_validation_is_empty(
        env in prop::collection::btree_map("[A-Z_]{1,12}", ".*", 0..8),
    ) {
        let mut specs = BTreeMap::new();
        for name in env.keys() {
            specs.insert(name.clone(), EnvVarSpec::new(EnvVarKind::Integer).deprecated(None));
        }
        let result = EnvVarValidator::default().validate(&env, &specs, &EnvVarOptions::disabled());
        prop_assert_eq!(result, EnvVarValidation::default());
    }
}
