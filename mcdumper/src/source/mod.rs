//! Artifact sources.
//!
//! A source knows where its remote catalog lives, how to turn a catalog entry
//! into download targets, and how its local manifest is encoded. Everything
//! else (diffing, fetching, concurrency, persistence) is shared by
//! [`crate::mirror::Mirror`].

pub mod java;
pub mod mcp;

use std::collections::BTreeSet;
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

use crate::error::{DumperError, DumperResult};
use crate::fetch::{ArtifactFetcher, DownloadTarget};
use crate::http::HttpClient;
use crate::manifest::ManifestStore;

pub use java::{JavaSource, JavaVersion};
pub use mcp::{McpSource, McpVersion};

/// One remote artifact set.
///
/// `Display` renders the label used in logs and reports.
pub trait VersionDescriptor: Clone + Display + Send + Sync {
    /// Identity recorded in the local manifest.
    type Key: Ord + Clone + Debug + Send + Sync;

    /// The manifest key of this descriptor.
    fn key(&self) -> Self::Key;
}

/// A remote catalog of versioned artifacts mirrored into a local root.
pub trait ArtifactSource: Send + Sync {
    /// Descriptor type produced by this source's catalog.
    type Descriptor: VersionDescriptor;

    /// Short source name used in logs and reports.
    fn name(&self) -> &str;

    /// Root directory this source mirrors into.
    fn root(&self) -> &Path;

    /// Store for this source's local manifest.
    fn manifest(&self) -> ManifestStore {
        ManifestStore::in_root(self.root())
    }

    /// Fetch and parse the remote catalog.
    ///
    /// Any failure is fatal for the run: a partial catalog would make the
    /// diff report versions as present when they are not.
    fn fetch_catalog(&self, http: &dyn HttpClient) -> DumperResult<Vec<Self::Descriptor>>;

    /// Local directory holding one version's artifacts.
    fn version_dir(&self, version: &Self::Descriptor) -> DumperResult<PathBuf>;

    /// Work out which files to download for `version` into `dir`.
    ///
    /// May itself fetch (and persist) a metadata document.
    fn resolve_targets(
        &self,
        http: &dyn HttpClient,
        fetcher: &ArtifactFetcher,
        version: &Self::Descriptor,
        dir: &Path,
    ) -> DumperResult<Vec<DownloadTarget>>;

    /// Serialize the manifest keys.
    fn encode_manifest(
        &self,
        keys: &BTreeSet<<Self::Descriptor as VersionDescriptor>::Key>,
    ) -> DumperResult<String>;

    /// Parse manifest content back into keys.
    fn decode_manifest(
        &self,
        content: &str,
    ) -> Result<BTreeSet<<Self::Descriptor as VersionDescriptor>::Key>, String>;
}

/// Check that a remote identifier is usable as a single path component.
pub(crate) fn path_component(value: &str) -> DumperResult<&str> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.contains('\0');

    if invalid {
        return Err(DumperError::InvalidPath(format!(
            "{:?} is not a valid directory name",
            value
        )));
    }
    Ok(value)
}
