//! Registry data: serving frameworks, instance profiles, community reports.
//!
//! The catalog is plain lookup data handed to the validators. A built-in
//! copy is embedded at compile time; a replacement may be loaded from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::envvar::{CommunityReport, EnvVarSpec};
use crate::validator::{AcceleratorCapability, AcceleratorRequirement};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Instance class that defers to the explicit custom instance type.
pub const CUSTOM_INSTANCE_CLASS: &str = "custom";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog{}: {source}", origin_suffix(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog lists {kind} '{name}' more than once")]
    Duplicate { kind: &'static str, name: String },
}

fn origin_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

impl From<CatalogError> for mcc_common::Error {
    fn from(err: CatalogError) -> Self {
        mcc_common::Error::Catalog(err.to_string())
    }
}

/// A serving framework (model server) profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameworkProfile {
    pub name: String,

    /// ML frameworks this server can host.
    #[serde(default)]
    pub ml_frameworks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Absent for CPU-agnostic servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<AcceleratorRequirement>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_vars: BTreeMap<String, EnvVarSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstanceProfile {
    pub name: String,
    pub accelerator: AcceleratorCapability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    #[serde(default)]
    pub schema_version: String,

    #[serde(default)]
    pub frameworks: Vec<FrameworkProfile>,

    /// In recommendation order.
    #[serde(default)]
    pub instances: Vec<InstanceProfile>,

    /// Instance class (`cpu-optimized`, `gpu-enabled`) → representative instance.
    #[serde(default)]
    pub instance_classes: BTreeMap<String, String>,

    #[serde(default)]
    pub env_reports: Vec<CommunityReport>,
}

impl Catalog {
    /// The embedded catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, None)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, Some(path))
    }

    fn from_json(content: &str, path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            serde_json::from_str(content).map_err(|source| CatalogError::Parse {
                path: path.map(Path::to_path_buf),
                source,
            })?;
        catalog.check_unique()?;
        Ok(catalog)
    }

    fn check_unique(&self) -> Result<(), CatalogError> {
        for (idx, fw) in self.frameworks.iter().enumerate() {
            if self.frameworks[..idx].iter().any(|o| o.name == fw.name) {
                return Err(CatalogError::Duplicate {
                    kind: "framework",
                    name: fw.name.clone(),
                });
            }
        }
        for (idx, inst) in self.instances.iter().enumerate() {
            if self.instances[..idx].iter().any(|o| o.name == inst.name) {
                return Err(CatalogError::Duplicate {
                    kind: "instance",
                    name: inst.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn framework(&self, name: &str) -> Option<&FrameworkProfile> {
        self.frameworks.iter().find(|fw| fw.name == name)
    }

    pub fn instance(&self, name: &str) -> Option<&InstanceProfile> {
        self.instances.iter().find(|inst| inst.name == name)
    }

    /// Resolve an instance class or explicit type to a profile.
    ///
    /// `custom` defers to `custom_type`; other classes map through
    /// `instance_classes`; anything else is looked up by name.
    pub fn instance_for(&self, instance_type: &str, custom_type: Option<&str>) -> Option<&InstanceProfile> {
        if instance_type == CUSTOM_INSTANCE_CLASS {
            return custom_type.and_then(|name| self.instance(name));
        }
        match self.instance_classes.get(instance_type) {
            Some(name) => self.instance(name),
            None => self.instance(instance_type),
        }
    }

    /// Instance capabilities in catalog order.
    pub fn capability_map(&self) -> impl Iterator<Item = (&str, &AcceleratorCapability)> {
        self.instances
            .iter()
            .map(|inst| (inst.name.as_str(), &inst.accelerator))
    }
}
