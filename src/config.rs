use serde::{Deserialize, Serialize};
use std::{path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::fetch::EmptyBodyPolicy;
use crate::manifest::MANIFEST_FILE_NAME;

pub const DEFAULT_RESOURCES_DIR: &str = "resources";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}", path.display())]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("parsing config {}", path.display())]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
}

/// Optional TOML file; every key may be left out.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub resources_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub on_empty: Option<EmptyBodyPolicy>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub resources_dir: PathBuf,
    pub manifest: PathBuf,
    pub on_empty: EmptyBodyPolicy,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// `overrides` (from the command line) win over `file`, which wins over defaults.
    pub fn resolve(overrides: Config, file: Config) -> Self {
        let resources_dir = overrides
            .resources_dir
            .or(file.resources_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES_DIR));
        let manifest = overrides
            .manifest
            .or(file.manifest)
            .unwrap_or_else(|| resources_dir.join(MANIFEST_FILE_NAME));
        Self {
            resources_dir,
            manifest,
            on_empty: overrides.on_empty.or(file.on_empty).unwrap_or_default(),
            timeout: overrides.timeout_secs.or(file.timeout_secs).map(Duration::from_secs),
        }
    }
}
