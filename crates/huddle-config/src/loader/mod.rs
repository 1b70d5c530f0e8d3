//! Loading `huddle.json5` from a single file or from a stack of layers.
//!
//! Each layer is schema-checked on its own, then the stack is merged with
//! requirements pinning the keys they set, and the merged result is
//! deserialized and validated as one `HuddleConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{ConfigError, HistoryProvider, HuddleConfig};
use log::info;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name looked up in every local layer.
const DEFAULT_CONFIG_FILE: &str = "huddle.json5";
/// Directory holding the user and repo layers.
const DEFAULT_CONFIG_DIR: &str = ".huddle";
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

/// Directory holding the system config and requirements on unix.
const SYSTEM_CONFIG_DIR: &str = "/etc/huddle";
/// Requirements file name under the system config directory.
const REQUIREMENTS_FILE: &str = "requirements.json5";

/// Merged config and the layers it came from, lowest precedence first.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub config: HuddleConfig,
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer was found. Declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// Admin-pinned values no other layer can override.
    Requirements,
    System,
    User,
    /// `huddle.json5` at the project root.
    Project,
    Cwd,
    /// Repo-local configuration under `.huddle/`.
    Repo,
    /// Files passed explicitly, e.g. `huddle serve --config`.
    Runtime,
}

impl fmt::Display for ConfigLayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigLayerSource::Requirements => "requirements",
            ConfigLayerSource::System => "system",
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Project => "project",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Repo => "repo",
            ConfigLayerSource::Runtime => "runtime",
        })
    }
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Where to look for each layer. `new` fills in the standard locations.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to resolve local layers.
    pub cwd: PathBuf,
    /// Optional system config path (defaults to `/etc/huddle/huddle.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user config path (defaults to `~/.huddle/huddle.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Optional requirements path for locked settings.
    pub requirements_path: Option<PathBuf>,
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks a directory as the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::system_path(DEFAULT_CONFIG_FILE),
            user_config_path: layer_io::user_path(),
            requirements_path: layer_io::system_path(REQUIREMENTS_FILE),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Append a required layer above every discovered one.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl HuddleConfig {
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value =
            json5::from_str(contents).map_err(|source| ConfigError::LayerSyntax {
                layer: "config".to_string(),
                source,
            })?;
        config_from_value(value, "config")
    }

    /// Layered load. Later layers win, except over keys pinned by the
    /// requirements file. Only runtime layers must exist.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = layer_io::canonical_or_self(&options.cwd)?;
        let requirements = match options.requirements_path.as_deref() {
            Some(path) => layer_io::read_layer(ConfigLayerSource::Requirements, path, false)?,
            None => None,
        };

        let mut loaded = Vec::new();
        for (source, path) in layer_io::discover_layers(&cwd, &options) {
            loaded.extend(layer_io::read_layer(source, &path, false)?);
        }
        for path in &options.runtime_paths {
            loaded.extend(layer_io::read_layer(ConfigLayerSource::Runtime, path, true)?);
        }

        // Requirements seed the merge and pin every key they set.
        let mut layers = Vec::with_capacity(loaded.len() + 1);
        let (mut merged, locked) = match requirements {
            Some(LoadedLayer { meta, value }) => {
                layers.push(meta);
                (value.clone(), Some(value))
            }
            None => (Value::Object(serde_json::Map::new()), None),
        };
        for LoadedLayer { meta, value } in loaded {
            merge::overlay_constrained(&mut merged, &value, locked.as_ref());
            layers.push(meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Cross-field checks run after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_attempts == 0 {
            return Err(ConfigError::Inconsistent(
                "history.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.history.backoff_min_ms > self.history.backoff_max_ms {
            return Err(ConfigError::Inconsistent(
                "history.backoff_min_ms must not exceed history.backoff_max_ms".to_string(),
            ));
        }
        if self.history.provider == HistoryProvider::File && self.history.path.is_none() {
            return Err(ConfigError::Inconsistent(
                "history.path is required for the file provider".to_string(),
            ));
        }
        if self.retrieval.generic_limit == 0 {
            return Err(ConfigError::Inconsistent(
                "retrieval.generic_limit must be at least 1".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        for roster in &self.workspaces {
            if !ids.insert(roster.id.as_str()) {
                return Err(ConfigError::Inconsistent(format!(
                    "workspace `{}` is declared more than once",
                    roster.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<HuddleConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: HuddleConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
