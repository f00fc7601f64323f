//! Artifact downloads into the per-version directory layout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DumperError, DumperResult};
use crate::http::HttpClient;

/// One file to download for a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Short name used in logs (e.g. "client", "mappings").
    pub name: String,
    /// Remote URL of the artifact.
    pub url: String,
    /// Local destination path.
    pub path: PathBuf,
    /// Whether the downloaded file is an archive to be expanded next to it.
    pub archive: bool,
}

impl DownloadTarget {
    /// Create a plain file target.
    pub fn file(name: impl Into<String>, url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path: path.into(),
            archive: false,
        }
    }

    /// Create an archive target whose contents get expanded after download.
    pub fn archive(
        name: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            archive: true,
            ..Self::file(name, url, path)
        }
    }
}

/// Downloads artifacts and writes them to disk.
///
/// Writes are full overwrites, so re-fetching a version after an interrupted
/// run is always safe.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactFetcher;

impl ArtifactFetcher {
    /// Create a new fetcher.
    pub fn new() -> Self {
        Self
    }

    /// Download `target` and write it to its destination path.
    ///
    /// Returns the number of bytes written.
    pub fn fetch(&self, http: &dyn HttpClient, target: &DownloadTarget) -> DumperResult<u64> {
        debug!(name = %target.name, url = %target.url, "Fetching artifact");
        let bytes = http.get(&target.url).map_err(DumperError::Download)?;
        self.write(&target.path, &bytes)?;
        Ok(bytes.len() as u64)
    }

    /// Write `bytes` to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> DumperResult<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(path, bytes).map_err(|e| DumperError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Create `dir` and its parents.
///
/// An existing directory is not an error, including one created concurrently
/// by another worker.
pub fn ensure_dir(dir: &Path) -> DumperResult<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(DumperError::CreateDirFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}
