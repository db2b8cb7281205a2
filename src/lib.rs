pub mod config;
pub mod fetch;
pub mod manifest;
pub mod resource;

pub use fetch::{run_batch, BatchSummary, EmptyBodyPolicy, FetchError, FetchOutcome, Fetcher};
pub use manifest::{Manifest, ManifestEntry, ManifestError};
pub use resource::ResourceDescriptor;

