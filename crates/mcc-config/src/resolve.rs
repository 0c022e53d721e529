//! Precedence resolution with provenance.
//!
//! For each parameter, in matrix order, origins are tried from highest to
//! lowest precedence. The first origin that both supplied a value and is
//! whitelisted for the parameter wins. A value from a non-whitelisted origin
//! is ignored without error. When nothing wins, the built-in default is used.
//!
//! A winning string of the form `$NAME` is an indirection: `NAME` is read
//! from the environment snapshot and substituted. If it is absent the
//! parameter resolves to null, never to the placeholder text.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::matrix::{ParameterMatrix, ParameterSpec};
use crate::source::{EnvSnapshot, Origin, RawSourceValues};
use crate::{Value, ValueMap};

/// Which source supplied a final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    CliOption,
    CliArgument,
    EnvVar,
    ExternalConfig,
    LocalConfig,
    PackageJson,
    /// Answered interactively.
    Prompt,
    /// Built-in default.
    Default,
    /// Computed from other values at finalize time.
    Derived,
    /// Auto-generated for a required parameter.
    Generated,
    Unset,
}

impl Provenance {
    /// Supplied by the user through a flag, argument, variable or document.
    pub fn is_explicit(&self) -> bool {
        matches!(
            self,
            Provenance::CliOption
                | Provenance::CliArgument
                | Provenance::EnvVar
                | Provenance::ExternalConfig
                | Provenance::LocalConfig
                | Provenance::PackageJson
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::CliOption => "cli_option",
            Provenance::CliArgument => "cli_argument",
            Provenance::EnvVar => "env_var",
            Provenance::ExternalConfig => "external_config",
            Provenance::LocalConfig => "local_config",
            Provenance::PackageJson => "package_json",
            Provenance::Prompt => "prompt",
            Provenance::Default => "default",
            Provenance::Derived => "derived",
            Provenance::Generated => "generated",
            Provenance::Unset => "unset",
        }
    }
}

impl From<Origin> for Provenance {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::CliOption => Provenance::CliOption,
            Origin::CliArgument => Provenance::CliArgument,
            Origin::EnvVar => Provenance::EnvVar,
            Origin::ExternalConfig => Provenance::ExternalConfig,
            Origin::LocalConfig => Provenance::LocalConfig,
            Origin::PackageJson => Provenance::PackageJson,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Values after precedence and whitelist filtering, plus provenance.
///
/// `values` holds only non-null entries; `provenance` has an entry for every
/// parameter in the matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    values: ValueMap,
    provenance: BTreeMap<String, Provenance>,
}

impl ResolvedConfiguration {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn provenance(&self, name: &str) -> Provenance {
        self.provenance
            .get(name)
            .copied()
            .unwrap_or(Provenance::Unset)
    }

    /// Whether `name` has a non-null value from an explicit source.
    pub fn is_explicit(&self, name: &str) -> bool {
        self.provenance(name).is_explicit() && self.values.contains_key(name)
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn provenance_map(&self) -> &BTreeMap<String, Provenance> {
        &self.provenance
    }

    /// Only values that were explicitly supplied; defaults are excluded.
    pub fn explicit_only(&self) -> ValueMap {
        self.values
            .iter()
            .filter(|(name, _)| self.provenance(name).is_explicit())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub(crate) fn into_parts(self) -> (ValueMap, BTreeMap<String, Provenance>) {
        (self.values, self.provenance)
    }

    fn record(&mut self, name: &str, value: Option<Value>, provenance: Provenance) {
        match value {
            Some(value) if !value.is_null() => {
                self.values.insert(name.to_string(), value);
            }
            _ => {
                self.values.remove(name);
            }
        }
        self.provenance.insert(name.to_string(), provenance);
    }
}

type Lookup = for<'a> fn(&'a RawSourceValues, &str) -> Option<&'a Value>;

fn cli_option<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.cli_options.get(name)
}

fn cli_argument<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.cli_argument.get(name)
}

fn env_var<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.env_vars.get(name)
}

fn external_config<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.external_config.get(name)
}

fn local_config<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.local_config.get(name)
}

fn package_json<'a>(raw: &'a RawSourceValues, name: &str) -> Option<&'a Value> {
    raw.package_json.get(name)
}

/// The precedence chain, highest first.
const PRECEDENCE: [(Origin, Lookup); 6] = [
    (Origin::CliOption, cli_option),
    (Origin::CliArgument, cli_argument),
    (Origin::EnvVar, env_var),
    (Origin::ExternalConfig, external_config),
    (Origin::LocalConfig, local_config),
    (Origin::PackageJson, package_json),
];

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*)$").expect("valid regex"));

/// Resolves raw source values against the parameter matrix.
#[derive(Debug)]
pub struct ConfigResolver<'m> {
    matrix: &'m ParameterMatrix,
    env: EnvSnapshot,
}

impl<'m> ConfigResolver<'m> {
    /// `env` is consulted only for `$NAME` indirections.
    pub fn new(matrix: &'m ParameterMatrix, env: EnvSnapshot) -> Self {
        ConfigResolver { matrix, env }
    }

    pub fn matrix(&self) -> &'m ParameterMatrix {
        self.matrix
    }

    /// Resolve every parameter in matrix order.
    pub fn resolve(&self, raw: &RawSourceValues) -> ResolvedConfiguration {
        let mut resolved = ResolvedConfiguration::default();

        for spec in self.matrix.iter() {
            let (value, provenance) = self.resolve_one(spec, raw);
            debug!(parameter = spec.name, source = %provenance, "resolved parameter");
            resolved.record(spec.name, value, provenance);
        }

        resolved
    }

    fn resolve_one(&self, spec: &ParameterSpec, raw: &RawSourceValues) -> (Option<Value>, Provenance) {
        for (origin, lookup) in PRECEDENCE {
            let Some(value) = lookup(raw, spec.name).filter(|v| !v.is_null()) else {
                continue;
            };
            if !spec.allows(origin.source()) {
                trace!(parameter = spec.name, origin = %origin, "source not whitelisted; ignored");
                continue;
            }
            let value = self.expand_token(value.clone()).map(|v| spec.kind.coerce(v));
            return (value, origin.into());
        }

        match spec.default {
            Some(default) => (Some(default.to_value()), Provenance::Default),
            None => (None, Provenance::Unset),
        }
    }

    /// Substitute `$NAME` from the environment snapshot.
    fn expand_token(&self, value: Value) -> Option<Value> {
        let Value::String(text) = &value else {
            return Some(value);
        };
        match TOKEN_RE.captures(text) {
            Some(caps) => {
                let var = &caps[1];
                match self.env.get(var) {
                    Some(found) => Some(Value::String(found.to_string())),
                    None => {
                        debug!(variable = var, "indirection target unset; resolving to null");
                        None
                    }
                }
            }
            None => Some(value),
        }
    }
}
