use std::{fs, io::{self, Write}, path::{Path, PathBuf}};

use colored::Colorize;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::ResourceDescriptor;

pub mod transport;

pub use transport::{HttpTransport, Transport};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("building HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("requesting {url}")]
    Request { url: String, #[source] source: reqwest::Error },
    #[error("requesting {url}: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("empty response from {url}")]
    EmptyBody { url: String },
    #[error("checking {}", path.display())]
    Stat { path: PathBuf, #[source] source: io::Error },
    #[error("creating directory {}", path.display())]
    CreateDir { path: PathBuf, #[source] source: io::Error },
    #[error("saving {}", path.display())]
    Write { path: PathBuf, #[source] source: io::Error },
}

/// What to do when a request succeeds but returns no bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyBodyPolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Skipped,
    Saved { bytes: usize },
    /// Empty body under [`EmptyBodyPolicy::Skip`]; nothing was written.
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub skipped: usize,
    pub saved: usize,
    pub empty: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize { self.skipped + self.saved + self.empty }
}

pub struct Fetcher<T> {
    transport: T,
    on_empty: EmptyBodyPolicy,
    progress: ProgressBar,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, on_empty: EmptyBodyPolicy::default(), progress: ProgressBar::hidden() }
    }

    pub fn with_empty_body_policy(mut self, policy: EmptyBodyPolicy) -> Self {
        self.on_empty = policy;
        self
    }

    /// Status lines are printed around this bar; `run_batch` advances it.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn transport(&self) -> &T { &self.transport }

    /// Makes `descriptor`'s destination hold the bytes behind its URL, unless something is already there.
    pub async fn fetch(&self, descriptor: &ResourceDescriptor) -> Result<FetchOutcome, FetchError> {
        let path = descriptor.destination_path();
        let url = descriptor.url();

        // Symlinks are followed; a dangling one is fetched through.
        let exists = path
            .try_exists()
            .map_err(|source| FetchError::Stat { path: path.to_path_buf(), source })?;
        if exists {
            self.status(format!("{} already exists. Skipping download.", path.display()).as_str().dimmed());
            return Ok(FetchOutcome::Skipped);
        }
        let target = link_target(path)
            .map_err(|source| FetchError::Stat { path: path.to_path_buf(), source })?;
        let path = target.as_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| FetchError::CreateDir { path: parent.to_path_buf(), source })?;
        }

        self.status(format!("Downloading {} to {}...", url, path.display()).as_str().normal());
        let bytes = self.transport.get(url).await?;

        if bytes.is_empty() {
            return match self.on_empty {
                EmptyBodyPolicy::Fail => Err(FetchError::EmptyBody { url: url.to_string() }),
                EmptyBodyPolicy::Skip => {
                    self.progress.suspend(|| {
                        eprintln!("{} empty response from {}, skipping", "warning:".yellow().bold(), url)
                    });
                    Ok(FetchOutcome::Empty)
                }
            };
        }

        persist(path, &bytes).map_err(|source| FetchError::Write { path: path.to_path_buf(), source })?;
        self.status(format!("Download complete: {}", path.display()).as_str().green());
        Ok(FetchOutcome::Saved { bytes: bytes.len() })
    }

    fn status(&self, line: colored::ColoredString) {
        self.progress.suspend(|| println!("{}", line));
    }
}

/// Fetches `descriptors` one after another, stopping at the first error.
pub async fn run_batch<T: Transport>(
    fetcher: &Fetcher<T>,
    descriptors: &[ResourceDescriptor],
) -> Result<BatchSummary, FetchError> {
    let mut summary = BatchSummary::default();
    fetcher.progress.set_length(descriptors.len() as u64);
    for descriptor in descriptors {
        match fetcher.fetch(descriptor).await {
            Ok(FetchOutcome::Skipped) => summary.skipped += 1,
            Ok(FetchOutcome::Saved { .. }) => summary.saved += 1,
            Ok(FetchOutcome::Empty) => summary.empty += 1,
            Err(e) => {
                fetcher.progress.abandon();
                return Err(e);
            }
        }
        fetcher.progress.inc(1);
    }
    fetcher.progress.finish_and_clear();
    Ok(summary)
}

/// Where the bytes should go: `path` itself, or what it points at when it is a symlink.
fn link_target(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let dest = fs::read_link(path)?;
            Ok(match path.parent() {
                Some(parent) if dest.is_relative() => parent.join(dest),
                _ => dest,
            })
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// Sibling file the bytes land in before being renamed over `path`.
fn part_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.part", name))
}

fn persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = part_path(path);
    log::debug!("writing {} bytes to {}", bytes.len(), tmp.display());
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp) {
            log::debug!("leaving {} behind: {}", tmp.display(), e);
        }
    }
    result
}
