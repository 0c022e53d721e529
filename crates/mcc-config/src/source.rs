//! Input sources and raw value collection.
//!
//! Collection reads whatever each source actually supplies, without
//! consulting source permissions. Filtering by the parameter matrix happens
//! later in the resolver, so a value supplied by the wrong source is simply
//! never picked up.
//!
//! Sources, highest precedence first:
//! 1. CLI options (`--framework`, ...)
//! 2. Positional project-name argument
//! 3. Environment variables (fixed 1:1 mapping per parameter)
//! 4. External config document (`--config` / `ML_CONTAINER_CREATOR_CONFIG`)
//! 5. `ml-container.config.json` in the working directory
//! 6. `"ml-container-creator"` section of `package.json`

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::matrix::{params, ParameterMatrix, Source};
use crate::{Value, ValueMap};

/// Environment variable naming the external config document.
pub const ENV_CONFIG_PATH: &str = "ML_CONTAINER_CREATOR_CONFIG";

/// Conventional config document in the working directory.
pub const LOCAL_CONFIG_FILENAME: &str = "ml-container.config.json";

/// Project descriptor and the section read from it.
pub const PACKAGE_FILENAME: &str = "package.json";
pub const PACKAGE_SECTION: &str = "ml-container-creator";

/// Errors while reading configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {format} in {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    #[error("Config document {} must contain an object at {location}", path.display())]
    NotAnObject { path: PathBuf, location: String },
}

impl From<ConfigError> for mcc_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => mcc_common::Error::DocumentNotFound { path },
            ConfigError::Io { source, .. } => mcc_common::Error::Io(source),
            ConfigError::Parse { ref path, .. } | ConfigError::NotAnObject { ref path, .. } => {
                mcc_common::Error::DocumentParse {
                    path: path.clone(),
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Where a raw value came from. Declaration order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    CliOption,
    CliArgument,
    EnvVar,
    ExternalConfig,
    LocalConfig,
    PackageJson,
}

impl Origin {
    /// All origins, highest precedence first.
    pub const PRECEDENCE: [Origin; 6] = [
        Origin::CliOption,
        Origin::CliArgument,
        Origin::EnvVar,
        Origin::ExternalConfig,
        Origin::LocalConfig,
        Origin::PackageJson,
    ];

    /// The permission class checked against `ParameterSpec::allowed_sources`.
    pub fn source(self) -> Source {
        match self {
            Origin::CliOption => Source::CliOption,
            Origin::CliArgument => Source::CliArgument,
            Origin::EnvVar => Source::EnvVar,
            Origin::ExternalConfig | Origin::LocalConfig => Source::ConfigFile,
            Origin::PackageJson => Source::PackageJson,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::CliOption => "cli_option",
            Origin::CliArgument => "cli_argument",
            Origin::EnvVar => "env_var",
            Origin::ExternalConfig => "external_config",
            Origin::LocalConfig => "local_config",
            Origin::PackageJson => "package_json",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Injected snapshot of the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the real process environment.
    pub fn from_process() -> Self {
        EnvSnapshot {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSnapshot {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

/// Serialization format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from the file extension; anything unknown is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Yaml => write!(f, "YAML"),
            DocumentFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// A loaded key/value configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub path: PathBuf,
    /// SHA-256 of the raw file content.
    pub hash: String,
    pub values: ValueMap,
}

impl ConfigDocument {
    /// Load a whole document as a parameter map.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_document(path)?;
        Self::parse(path, &content)
    }

    /// Parse document content; `path` picks the format and names errors.
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let format = DocumentFormat::from_path(path);
        let root = parse_document(path, content, format)?;
        let values = into_object(path, root, "document root")?;

        Ok(ConfigDocument {
            path: path.to_path_buf(),
            hash: compute_sha256(content),
            values,
        })
    }

    /// Load the named section of a package descriptor.
    ///
    /// Returns `Ok(None)` when the descriptor has no such section.
    pub fn load_section(path: &Path, section: &str) -> Result<Option<Self>, ConfigError> {
        let content = read_document(path)?;
        let root = parse_document(path, &content, DocumentFormat::Json)?;
        let mut root = into_object(path, root, "document root")?;

        match root.remove(section) {
            None | Some(Value::Null) => Ok(None),
            Some(section_value) => {
                let values = into_object(path, section_value, section)?;
                Ok(Some(ConfigDocument {
                    path: path.to_path_buf(),
                    hash: compute_sha256(&content),
                    values,
                }))
            }
        }
    }
}

fn read_document(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn parse_document(path: &Path, content: &str, format: DocumentFormat) -> Result<Value, ConfigError> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    })
}

fn into_object(path: &Path, value: Value, location: &str) -> Result<ValueMap, ConfigError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
            location: location.to_string(),
        }),
    }
}

/// Compute SHA-256 hash of a string.
pub(crate) fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Metadata about a document that contributed raw values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentInfo {
    pub origin: Origin,
    pub path: PathBuf,
    pub hash: String,
}

/// Per-origin maps of everything that was actually supplied.
///
/// Built fresh for each run and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSourceValues {
    pub cli_options: ValueMap,
    pub cli_argument: ValueMap,
    pub env_vars: ValueMap,
    pub external_config: ValueMap,
    pub local_config: ValueMap,
    pub package_json: ValueMap,
    pub documents: Vec<DocumentInfo>,
}

impl RawSourceValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, origin: Origin) -> &ValueMap {
        match origin {
            Origin::CliOption => &self.cli_options,
            Origin::CliArgument => &self.cli_argument,
            Origin::EnvVar => &self.env_vars,
            Origin::ExternalConfig => &self.external_config,
            Origin::LocalConfig => &self.local_config,
            Origin::PackageJson => &self.package_json,
        }
    }

    pub fn values_mut(&mut self, origin: Origin) -> &mut ValueMap {
        match origin {
            Origin::CliOption => &mut self.cli_options,
            Origin::CliArgument => &mut self.cli_argument,
            Origin::EnvVar => &mut self.env_vars,
            Origin::ExternalConfig => &mut self.external_config,
            Origin::LocalConfig => &mut self.local_config,
            Origin::PackageJson => &mut self.package_json,
        }
    }

    /// Record a raw value supplied by `origin`.
    pub fn insert(&mut self, origin: Origin, name: impl Into<String>, value: Value) {
        self.values_mut(origin).insert(name.into(), value);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, origin: Origin, name: impl Into<String>, value: Value) -> Self {
        self.insert(origin, name, value);
        self
    }
}

/// Command-line input before it is mapped onto origins.
#[derive(Debug, Clone, Default)]
pub struct CliInputs {
    /// Flag values keyed by parameter name.
    pub options: ValueMap,
    /// The positional project-name argument.
    pub positional: Option<String>,
    /// `--config` path for the external document.
    pub config_path: Option<PathBuf>,
}

/// Reads every source into `RawSourceValues`.
#[derive(Debug)]
pub struct SourceCollector<'m> {
    matrix: &'m ParameterMatrix,
    working_dir: PathBuf,
}

impl<'m> SourceCollector<'m> {
    pub fn new(matrix: &'m ParameterMatrix, working_dir: impl Into<PathBuf>) -> Self {
        SourceCollector {
            matrix,
            working_dir: working_dir.into(),
        }
    }

    /// Collect raw values from all sources.
    ///
    /// The external document is located via the CLI path first, then the
    /// environment. A missing external document is an error because it was
    /// asked for; missing conventional files are not.
    pub fn collect(&self, cli: &CliInputs, env: &EnvSnapshot) -> Result<RawSourceValues, ConfigError> {
        let mut raw = RawSourceValues::new();

        for (name, value) in &cli.options {
            if !value.is_null() {
                raw.insert(Origin::CliOption, name.clone(), self.coerce(name, value.clone()));
            }
        }

        if let Some(positional) = cli.positional.as_ref().filter(|p| !p.is_empty()) {
            raw.insert(
                Origin::CliArgument,
                params::PROJECT_NAME,
                Value::String(positional.clone()),
            );
        }

        for spec in self.matrix.iter() {
            if let Some(value) = spec.env_var.and_then(|var| env.get(var)) {
                raw.insert(
                    Origin::EnvVar,
                    spec.name,
                    spec.kind.coerce(Value::String(value.to_string())),
                );
            }
        }

        let external_path = cli
            .config_path
            .clone()
            .or_else(|| env.get(ENV_CONFIG_PATH).map(PathBuf::from));
        if let Some(path) = external_path {
            let path = self.in_working_dir(&path);
            let doc = ConfigDocument::load(&path)?;
            debug!(path = %path.display(), keys = doc.values.len(), "loaded external config");
            self.absorb(&mut raw, Origin::ExternalConfig, doc);
        }

        let local_path = self.working_dir.join(LOCAL_CONFIG_FILENAME);
        if local_path.is_file() {
            let doc = ConfigDocument::load(&local_path)?;
            debug!(path = %local_path.display(), keys = doc.values.len(), "loaded local config");
            self.absorb(&mut raw, Origin::LocalConfig, doc);
        }

        let package_path = self.working_dir.join(PACKAGE_FILENAME);
        if package_path.is_file() {
            if let Some(doc) = ConfigDocument::load_section(&package_path, PACKAGE_SECTION)? {
                debug!(path = %package_path.display(), keys = doc.values.len(), "loaded package section");
                self.absorb(&mut raw, Origin::PackageJson, doc);
            }
        }

        Ok(raw)
    }

    fn absorb(&self, raw: &mut RawSourceValues, origin: Origin, doc: ConfigDocument) {
        raw.documents.push(DocumentInfo {
            origin,
            path: doc.path.clone(),
            hash: doc.hash.clone(),
        });
        for (name, value) in doc.values {
            if value.is_null() {
                continue;
            }
            if !self.matrix.contains(&name) {
                debug!(origin = %origin, key = %name, "ignoring unrecognized key");
            }
            let value = self.coerce(&name, value);
            raw.insert(origin, name, value);
        }
    }

    fn coerce(&self, name: &str, value: Value) -> Value {
        match self.matrix.get(name) {
            Some(spec) => spec.kind.coerce(value),
            None => value,
        }
    }

    fn in_working_dir(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}
