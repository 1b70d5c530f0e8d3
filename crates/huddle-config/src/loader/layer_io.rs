//! Finding and reading config layers on disk.

use super::{
    ConfigLayer, ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, LayeredConfigOptions,
    LoadedLayer, schema,
};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read, parse and schema-check one layer.
///
/// A missing file is `Ok(None)` unless `required` is set.
pub(super) fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    required: bool,
) -> Result<Option<LoadedLayer>, ConfigError> {
    if !required && !path.is_file() {
        debug!("config layer absent (source={}, path={})", source, path.display());
        return Ok(None);
    }
    let label = format!("{}({})", source, path.display());
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::LayerUnreadable {
        layer: label.clone(),
        source: err,
    })?;
    let value: Value = json5::from_str(&raw).map_err(|err| ConfigError::LayerSyntax {
        layer: label.clone(),
        source: err,
    })?;
    schema::validate_layer_schema(&value, &label)?;
    debug!("config layer read (source={}, path={})", source, path.display());
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    }))
}

/// Optional layers in precedence order (low to high), one entry per file.
///
/// Project and repo layers only exist when a project root is found above
/// `cwd`; a file reachable through two layers is kept at its first position.
pub(super) fn discover_layers(
    cwd: &Path,
    options: &LayeredConfigOptions,
) -> Vec<(ConfigLayerSource, PathBuf)> {
    let root = project_root(cwd, &options.project_root_markers);

    let mut layers = Vec::new();
    layers.extend(options.system_config_path.clone().map(|path| (ConfigLayerSource::System, path)));
    layers.extend(options.user_config_path.clone().map(|path| (ConfigLayerSource::User, path)));
    if let Some(root) = &root {
        layers.push((ConfigLayerSource::Project, root.join(DEFAULT_CONFIG_FILE)));
    }
    layers.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE)));
    if let Some(root) = &root {
        layers.push((
            ConfigLayerSource::Repo,
            root.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
        ));
    }

    let mut seen = HashSet::new();
    layers.retain(|(_, path)| seen.insert(path.canonicalize().unwrap_or_else(|_| path.clone())));
    layers
}

/// `/etc/huddle/<file>` on unix.
pub(super) fn system_path(file: &str) -> Option<PathBuf> {
    if cfg!(unix) {
        Some(Path::new(super::SYSTEM_CONFIG_DIR).join(file))
    } else {
        None
    }
}

/// `~/.huddle/huddle.json5`.
pub(super) fn user_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(dirs.home_dir().join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
}

/// Canonical form of `path`, or `path` itself when it does not exist.
pub(super) fn canonical_or_self(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(ConfigError::LayerUnreadable {
            layer: format!("cwd({})", path.display()),
            source: err,
        }),
    }
}

fn project_root(cwd: &Path, markers: &[String]) -> Option<PathBuf> {
    let root = cwd
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))?;
    debug!("project root found (root={})", root.display());
    Some(root.to_path_buf())
}
