//! Property-based tests for precedence and whitelist invariants.

use mcc_config::{
    ConfigResolver, EnvSnapshot, Origin, ParameterMatrix, Provenance, RawSourceValues,
};
use proptest::prelude::*;
use serde_json::Value;

fn origin_strategy() -> impl Strategy<Value = Origin> {
    prop::sample::select(Origin::PRECEDENCE.to_vec())
}

fn param_strategy() -> impl Strategy<Value = &'static str> {
    let names: Vec<&'static str> = ParameterMatrix::builtin().names().collect();
    prop::sample::select(names)
}

/// Plain string values; never `$NAME` tokens.
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

fn supplied_strategy() -> impl Strategy<Value = Vec<(Origin, &'static str, String)>> {
    prop::collection::vec((origin_strategy(), param_strategy(), value_strategy()), 0..24)
}

fn build_raw(supplied: &[(Origin, &'static str, String)]) -> RawSourceValues {
    let mut raw = RawSourceValues::new();
    for (origin, name, value) in supplied {
        raw.insert(*origin, *name, Value::String(value.clone()));
    }
    raw
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// A value only supplied by a non-whitelisted origin never wins.
    #[test]
    fn non_whitelisted_values_never_win(supplied in supplied_strategy()) {
        let matrix = ParameterMatrix::builtin();
        let raw = build_raw(&supplied);
        let resolved = ConfigResolver::new(&matrix, EnvSnapshot::default()).resolve(&raw);

        for spec in matrix.iter() {
            let provenance = resolved.provenance(spec.name);
            for origin in Origin::PRECEDENCE {
                if !spec.allows(origin.source()) {
                    prop_assert_ne!(provenance, Provenance::from(origin));
                }
            }
        }
    }

    /// The winner is the highest-precedence whitelisted origin that supplied a value.
    #[test]
    fn highest_permitted_origin_wins(supplied in supplied_strategy()) {
        let matrix = ParameterMatrix::builtin();
        let raw = build_raw(&supplied);
        let resolved = ConfigResolver::new(&matrix, EnvSnapshot::default()).resolve(&raw);

        for spec in matrix.iter() {
            let winner = Origin::PRECEDENCE
                .into_iter()
                .find(|o| spec.allows(o.source()) && raw.values(*o).contains_key(spec.name));
            match winner {
                Some(origin) => {
                    prop_assert_eq!(resolved.provenance(spec.name), Provenance::from(origin));
                    let expected = spec.kind.coerce(raw.values(origin)[spec.name].clone());
                    prop_assert_eq!(resolved.get(spec.name), Some(&expected));
                }
                None => {
                    let expected = if spec.default.is_some() { Provenance::Default } else { Provenance::Unset };
                    prop_assert_eq!(resolved.provenance(spec.name), expected);
                }
            }
        }
    }

    /// Identical inputs resolve identically.
    #[test]
    fn resolution_is_idempotent(supplied in supplied_strategy()) {
        let matrix = ParameterMatrix::builtin();
        let raw = build_raw(&supplied);
        let resolver = ConfigResolver::new(&matrix, EnvSnapshot::default());

        prop_assert_eq!(resolver.resolve(&raw), resolver.resolve(&raw.clone()));
    }

    /// Every matrix parameter has a provenance entry and nothing else does.
    #[test]
    fn provenance_covers_matrix(supplied in supplied_strategy()) {
        let matrix = ParameterMatrix::builtin();
        let raw = build_raw(&supplied);
        let resolved = ConfigResolver::new(&matrix, EnvSnapshot::default()).resolve(&raw);

        prop_assert_eq!(resolved.provenance_map().len(), matrix.len());
        for name in resolved.values().keys() {
            prop_assert!(matrix.contains(name));
        }
    }
}
