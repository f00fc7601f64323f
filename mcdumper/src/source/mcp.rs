//! MCP mapping archives.
//!
//! Layout under the source root:
//!
//! ```text
//! mcp/
//! ├── versions.json             # {"1.12.2": {"stable": ["39"]}}
//! └── 1.12.2/
//!     └── stable_39/
//!         ├── mappings.zip
//!         ├── fields.csv        # expanded archive entries
//!         └── methods.csv
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{path_component, ArtifactSource, VersionDescriptor};
use crate::error::{DumperError, DumperResult};
use crate::fetch::{ArtifactFetcher, DownloadTarget};
use crate::http::HttpClient;
use crate::manifest::{self, NestedVersions};

/// Default URL of the mapping catalog.
pub const DEFAULT_MANIFEST_URL: &str = "http://export.mcpbot.bspk.rs/versions.json";

/// Default base URL mapping archives are served from.
pub const DEFAULT_DOWNLOAD_BASE: &str = "http://export.mcpbot.bspk.rs";

/// Filename of the downloaded archive inside each version directory.
pub const ARCHIVE_FILENAME: &str = "mappings.zip";

/// One mapping release: game version, channel and release number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct McpVersion {
    /// Game version the mappings apply to, e.g. "1.12.2".
    pub group: String,
    /// Mapping channel, e.g. "stable" or "snapshot".
    pub kind: String,
    /// Release within the channel, e.g. "39" or "20180814".
    pub release: String,
}

impl McpVersion {
    /// Create a mapping descriptor.
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            release: release.into(),
        }
    }

    /// Archive URL below `base`.
    ///
    /// `<base>/mcp_<kind>/<release>-<group>/mcp_<kind>-<release>-<group>.zip`
    pub fn url(&self, base: &str) -> String {
        format!(
            "{base}/mcp_{kind}/{release}-{group}/mcp_{kind}-{release}-{group}.zip",
            base = base.trim_end_matches('/'),
            kind = self.kind,
            release = self.release,
            group = self.group,
        )
    }
}

impl fmt::Display for McpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}-{}", self.kind, self.release, self.group)
    }
}

impl Ord for McpVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Distinct tuples can render identically ("a-b" as release or group),
        // so fall back to the fields to keep Ord consistent with Eq.
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| {
                (&self.group, &self.kind, &self.release).cmp(&(
                    &other.group,
                    &other.kind,
                    &other.release,
                ))
            })
    }
}

impl PartialOrd for McpVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl VersionDescriptor for McpVersion {
    type Key = McpVersion;

    fn key(&self) -> McpVersion {
        self.clone()
    }
}

/// Flatten nested `group -> kind -> releases` data into descriptors.
fn flatten(nested: NestedVersions) -> Vec<McpVersion> {
    nested
        .into_iter()
        .flat_map(|(group, kinds)| {
            kinds.into_iter().flat_map(move |(kind, releases)| {
                let group = group.clone();
                releases
                    .into_iter()
                    .map(move |release| McpVersion::new(group.clone(), kind.clone(), release))
            })
        })
        .collect()
}

/// Source for MCP mapping archives.
#[derive(Debug, Clone)]
pub struct McpSource {
    root: PathBuf,
    manifest_url: String,
    download_base: String,
}

impl McpSource {
    /// Create a source mirroring into `root` from the default catalog.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }

    /// Use a different catalog URL.
    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    /// Use a different archive base URL.
    pub fn with_download_base(mut self, base: impl Into<String>) -> Self {
        self.download_base = base.into();
        self
    }

    /// Catalog URL.
    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    /// Archive base URL.
    pub fn download_base(&self) -> &str {
        &self.download_base
    }
}

impl ArtifactSource for McpSource {
    type Descriptor = McpVersion;

    fn name(&self) -> &str {
        "mcp"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_catalog(&self, http: &dyn HttpClient) -> DumperResult<Vec<McpVersion>> {
        let body = http
            .get(&self.manifest_url)
            .map_err(DumperError::CatalogFetch)?;

        let parse_err = |reason: String| DumperError::CatalogParse {
            url: self.manifest_url.clone(),
            reason,
        };
        let text = std::str::from_utf8(&body).map_err(|e| parse_err(e.to_string()))?;
        let versions = flatten(manifest::decode_nested(text).map_err(parse_err)?);

        debug!(count = versions.len(), "Parsed mcp catalog");
        Ok(versions)
    }

    fn version_dir(&self, version: &McpVersion) -> DumperResult<PathBuf> {
        path_component(&version.kind)?;
        path_component(&version.release)?;
        Ok(self
            .root
            .join(path_component(&version.group)?)
            .join(format!("{}_{}", version.kind, version.release)))
    }

    fn resolve_targets(
        &self,
        _http: &dyn HttpClient,
        _fetcher: &ArtifactFetcher,
        version: &McpVersion,
        dir: &Path,
    ) -> DumperResult<Vec<DownloadTarget>> {
        Ok(vec![DownloadTarget::archive(
            "mappings",
            version.url(&self.download_base),
            dir.join(ARCHIVE_FILENAME),
        )])
    }

    fn encode_manifest(&self, keys: &BTreeSet<McpVersion>) -> DumperResult<String> {
        let mut nested = NestedVersions::new();
        for version in keys {
            nested
                .entry(version.group.clone())
                .or_default()
                .entry(version.kind.clone())
                .or_default()
                .push(version.release.clone());
        }
        manifest::encode_nested(nested)
    }

    fn decode_manifest(&self, content: &str) -> Result<BTreeSet<McpVersion>, String> {
        manifest::decode_nested(content).map(|nested| flatten(nested).into_iter().collect())
    }
}
