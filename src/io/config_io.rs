use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::store::atomic_write;
use crate::model::config::{CONFIG_KEYS, Config, SORT_KEYS, THEMES};
use crate::model::task::TaskStatus;

const CONFIG_FILE: &str = "config.yaml";

/// Error type for configuration loading and editing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key '{0}' (expected one of: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("no global config directory available")]
    NoGlobalDir,
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Locations of the two config layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub global: Option<PathBuf>,
    pub local: PathBuf,
}

impl ConfigPaths {
    /// Global file under `$XDG_CONFIG_HOME` (or the platform config dir),
    /// local file inside the project root.
    pub fn for_root(root: &Path) -> Self {
        ConfigPaths {
            global: global_config_dir().map(|dir| dir.join("tada").join(CONFIG_FILE)),
            local: root.join(CONFIG_FILE),
        }
    }

    fn layer(&self, global: bool) -> Result<&Path, ConfigError> {
        if global {
            self.global.as_deref().ok_or(ConfigError::NoGlobalDir)
        } else {
            Ok(&self.local)
        }
    }
}

fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir(),
    }
}

/// Read one layer. A missing file is an empty layer.
pub fn read_layer(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Effective config: the global layer with local keys on top.
pub fn load_config(paths: &ConfigPaths) -> Result<Config, ConfigError> {
    let global = match &paths.global {
        Some(path) => read_layer(path)?,
        None => Config::default(),
    };
    Ok(global.merged_with(read_layer(&paths.local)?))
}

/// Like [`load_config`], but a broken file only costs a warning.
pub fn load_config_or_default(paths: &ConfigPaths) -> Config {
    load_config(paths).unwrap_or_else(|e| {
        log::warn!("ignoring config: {e}");
        Config::default()
    })
}

/// Check a key/value pair before it is written.
pub fn validate(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    match key {
        "default_sort" if !SORT_KEYS.contains(&value) => {
            Err(invalid(format!("expected one of {}", SORT_KEYS.join(", "))))
        }
        "theme" if !THEMES.contains(&value) => {
            Err(invalid(format!("expected one of {}", THEMES.join(", "))))
        }
        "default_status" => value
            .parse::<TaskStatus>()
            .map(|_| ())
            .map_err(|e| invalid(e.to_string())),
        k if !CONFIG_KEYS.contains(&k) => Err(ConfigError::UnknownKey(k.to_string())),
        _ => Ok(()),
    }
}

/// Set `key` in a single layer and write that layer back. Keys from the
/// other layer are left where they are.
pub fn set_value(
    paths: &ConfigPaths,
    key: &str,
    value: &str,
    global: bool,
) -> Result<PathBuf, ConfigError> {
    validate(key, value)?;
    let path = paths.layer(global)?.to_path_buf();
    let mut layer = read_layer(&path)?;
    if !layer.set(key, value) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let text = serde_yaml::to_string(&layer)?;
    atomic_write(&path, text.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    log::info!("config: set {key} in {}", path.display());
    Ok(path)
}
