use std::fmt;
use std::path::{Path, PathBuf};

/// A remote asset and the local path it must end up at.
///
/// Nothing is validated here; a bad URL only surfaces when the descriptor is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    url: String,
    destination_path: PathBuf,
}

impl ResourceDescriptor {
    pub fn new(url: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self { url: url.into(), destination_path: destination_path.into() }
    }

    pub fn url(&self) -> &str { &self.url }

    pub fn destination_path(&self) -> &Path { &self.destination_path }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.destination_path.display())
    }
}
