use std::{fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::ResourceDescriptor;

pub const MANIFEST_FILE_NAME: &str = "resources.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("resources file {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("reading resources file {}", path.display())]
    Read { path: PathBuf, #[source] source: io::Error },
    #[error("parsing resources file {}", path.display())]
    Parse { path: PathBuf, #[source] source: serde_json::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    /// Relative to the resources root.
    pub destination_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub textures: Vec<ManifestEntry>,
    #[serde(default)]
    pub models: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let exists = path
            .try_exists()
            .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
        if !exists {
            return Err(ManifestError::Missing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)
            .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
        let manifest = Self::from_json(&data)
            .map_err(|source| ManifestError::Parse { path: path.to_path_buf(), source })?;
        log::debug!(
            "loaded {}: {} textures, {} models",
            path.display(),
            manifest.textures.len(),
            manifest.models.len()
        );
        Ok(manifest)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Textures first, then models, each destination joined onto `resources_dir`.
    pub fn descriptors(&self, resources_dir: &Path) -> Vec<ResourceDescriptor> {
        self.textures
            .iter()
            .chain(self.models.iter())
            .map(|e| ResourceDescriptor::new(e.url.clone(), resources_dir.join(&e.destination_path)))
            .collect()
    }

    pub fn len(&self) -> usize { self.textures.len() + self.models.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
