//! Error types for the mirror.
//!
//! Variants fall into three groups that the orchestrator treats differently:
//! catalog and manifest errors abort a source's run, while fetch, write and
//! extraction errors only fail the version being processed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;

/// Result type for mirror operations.
pub type DumperResult<T> = Result<T, DumperError>;

/// Errors that can occur while mirroring an artifact source.
#[derive(Debug, Error)]
pub enum DumperError {
    /// Failed to fetch the remote version catalog.
    #[error("failed to fetch catalog: {0}")]
    CatalogFetch(#[source] HttpError),

    /// The remote version catalog is malformed.
    #[error("failed to parse catalog from {url}: {reason}")]
    CatalogParse { url: String, reason: String },

    /// Failed to fetch a per-version metadata document.
    #[error("failed to fetch version metadata: {0}")]
    MetadataFetch(#[source] HttpError),

    /// A per-version metadata document is malformed.
    #[error("failed to parse version metadata from {url}: {reason}")]
    MetadataParse { url: String, reason: String },

    /// Failed to download an artifact.
    #[error("failed to download artifact: {0}")]
    Download(#[source] HttpError),

    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory that did not already exist.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Archive extraction failed.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// An archive entry would be written outside the destination directory.
    #[error("refusing to extract entry {entry:?} from {}: path escapes destination", archive.display())]
    UnsafeArchiveEntry { archive: PathBuf, entry: String },

    /// The local manifest could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestRead { path: PathBuf, source: io::Error },

    /// The local manifest exists but is corrupt.
    #[error("corrupt manifest {}: {reason}", path.display())]
    ManifestParse { path: PathBuf, reason: String },

    /// The local manifest could not be persisted.
    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite { path: PathBuf, source: io::Error },

    /// The in-memory manifest could not be serialized.
    #[error("failed to encode manifest: {0}")]
    ManifestEncode(#[from] serde_json::Error),

    /// A remote identifier cannot be used as a path component.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DumperError {
    /// Whether this error aborts the whole source run rather than one item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CatalogFetch(_)
                | Self::CatalogParse { .. }
                | Self::ManifestRead { .. }
                | Self::ManifestParse { .. }
                | Self::ManifestWrite { .. }
                | Self::ManifestEncode(_)
                | Self::InvalidConfig(_)
        )
    }
}
