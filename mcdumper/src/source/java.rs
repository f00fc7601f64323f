//! Game client and server jars.
//!
//! Layout under the source root:
//!
//! ```text
//! java/
//! ├── versions.json        # ["1.12.2", "1.13", ...]
//! └── 1.12.2/
//!     ├── version.json     # per-version metadata, verbatim
//!     ├── client.jar
//!     └── server.jar
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{path_component, ArtifactSource, VersionDescriptor};
use crate::error::{DumperError, DumperResult};
use crate::fetch::{ArtifactFetcher, DownloadTarget};
use crate::http::HttpClient;
use crate::manifest;

/// Default URL of the launcher version catalog.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Sub-artifacts downloaded for each version.
pub const ARTIFACT_NAMES: [&str; 2] = ["client", "server"];

/// Filename of the persisted per-version metadata document.
pub const METADATA_FILENAME: &str = "version.json";

/// A game version as listed in the launcher catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JavaVersion {
    /// Version id, e.g. "1.12.2" or "19w14a".
    pub id: String,
    /// URL of the per-version metadata document.
    pub url: String,
}

impl JavaVersion {
    /// Create a version descriptor.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl VersionDescriptor for JavaVersion {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Deserialize)]
struct Catalog {
    versions: Vec<JavaVersion>,
}

#[derive(Debug, Deserialize)]
struct VersionMetadata {
    downloads: BTreeMap<String, Download>,
}

#[derive(Debug, Deserialize)]
struct Download {
    url: String,
}

/// Source for game client and server jars.
#[derive(Debug, Clone)]
pub struct JavaSource {
    root: PathBuf,
    manifest_url: String,
}

impl JavaSource {
    /// Create a source mirroring into `root` from the default catalog.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
        }
    }

    /// Use a different catalog URL.
    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    /// Catalog URL.
    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }
}

impl ArtifactSource for JavaSource {
    type Descriptor = JavaVersion;

    fn name(&self) -> &str {
        "java"
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn fetch_catalog(&self, http: &dyn HttpClient) -> DumperResult<Vec<JavaVersion>> {
        let body = http
            .get(&self.manifest_url)
            .map_err(DumperError::CatalogFetch)?;

        let catalog: Catalog =
            serde_json::from_slice(&body).map_err(|e| DumperError::CatalogParse {
                url: self.manifest_url.clone(),
                reason: e.to_string(),
            })?;

        debug!(count = catalog.versions.len(), "Parsed java catalog");
        Ok(catalog.versions)
    }

    fn version_dir(&self, version: &JavaVersion) -> DumperResult<PathBuf> {
        Ok(self.root.join(path_component(&version.id)?))
    }

    fn resolve_targets(
        &self,
        http: &dyn HttpClient,
        fetcher: &ArtifactFetcher,
        version: &JavaVersion,
        dir: &Path,
    ) -> DumperResult<Vec<DownloadTarget>> {
        let body = http.get(&version.url).map_err(DumperError::MetadataFetch)?;
        fetcher.write(&dir.join(METADATA_FILENAME), &body)?;

        let metadata: VersionMetadata =
            serde_json::from_slice(&body).map_err(|e| DumperError::MetadataParse {
                url: version.url.clone(),
                reason: e.to_string(),
            })?;

        Ok(ARTIFACT_NAMES
            .iter()
            .filter_map(|name| {
                let download = metadata.downloads.get(*name)?;
                Some(DownloadTarget::file(
                    *name,
                    download.url.clone(),
                    dir.join(format!("{}.jar", name)),
                ))
            })
            .collect())
    }

    fn encode_manifest(&self, keys: &BTreeSet<String>) -> DumperResult<String> {
        manifest::encode_flat(keys)
    }

    fn decode_manifest(&self, content: &str) -> Result<BTreeSet<String>, String> {
        manifest::decode_flat(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;
    use tempfile::TempDir;

    const CATALOG_URL: &str = "http://meta.test/version_manifest.json";

    fn source(root: &Path) -> JavaSource {
        JavaSource::new(root).with_manifest_url(CATALOG_URL)
    }

    #[test]
    fn test_default_manifest_url() {
        let source = JavaSource::new("java");
        assert_eq!(source.manifest_url(), DEFAULT_MANIFEST_URL);
        assert_eq!(source.name(), "java");
    }

    #[test]
    fn test_fetch_catalog_parses_versions() {
        let http = MockHttpClient::new().with_body(
            CATALOG_URL,
            r#"{
                "latest": {"release": "1.13", "snapshot": "1.13"},
                "versions": [
                    {"id": "1.13", "type": "release", "url": "http://meta.test/1.13.json"},
                    {"id": "1.12.2", "type": "release", "url": "http://meta.test/1.12.2.json"}
                ]
            }"#,
        );

        let versions = source(Path::new("java")).fetch_catalog(&http).unwrap();

        assert_eq!(
            versions,
            vec![
                JavaVersion::new("1.13", "http://meta.test/1.13.json"),
                JavaVersion::new("1.12.2", "http://meta.test/1.12.2.json"),
            ]
        );
    }

    #[test]
    fn test_fetch_catalog_missing_field_is_fatal() {
        let http = MockHttpClient::new()
            .with_body(CATALOG_URL, r#"{"versions": [{"id": "1.13"}]}"#);

        let err = source(Path::new("java")).fetch_catalog(&http).unwrap_err();

        assert!(matches!(err, DumperError::CatalogParse { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_fetch_catalog_network_failure_is_fatal() {
        let err = source(Path::new("java"))
            .fetch_catalog(&MockHttpClient::new())
            .unwrap_err();

        assert!(matches!(err, DumperError::CatalogFetch(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_resolve_targets_allow_list() {
        let temp = TempDir::new().unwrap();
        let metadata = r#"{
            "downloads": {
                "client": {"sha1": "aa", "size": 1, "url": "http://dl.test/client.jar"},
                "server": {"sha1": "bb", "size": 2, "url": "http://dl.test/server.jar"},
                "client_mappings": {"sha1": "cc", "size": 3, "url": "http://dl.test/client.txt"}
            }
        }"#;
        let http = MockHttpClient::new().with_body("http://meta.test/1.13.json", metadata);
        let version = JavaVersion::new("1.13", "http://meta.test/1.13.json");
        let source = source(temp.path());
        let dir = source.version_dir(&version).unwrap();

        let targets = source
            .resolve_targets(&http, &ArtifactFetcher::new(), &version, &dir)
            .unwrap();

        let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["client", "server"]);
        assert_eq!(targets[0].url, "http://dl.test/client.jar");
        assert_eq!(targets[1].path, dir.join("server.jar"));
        assert!(targets.iter().all(|t| !t.archive));
        assert_eq!(
            std::fs::read_to_string(dir.join(METADATA_FILENAME)).unwrap(),
            metadata
        );
    }

    #[test]
    fn test_resolve_targets_missing_server_is_skipped() {
        let temp = TempDir::new().unwrap();
        let http = MockHttpClient::new().with_body(
            "http://meta.test/1.0.json",
            r#"{"downloads": {"client": {"url": "http://dl.test/1.0/client.jar"}}}"#,
        );
        let version = JavaVersion::new("1.0", "http://meta.test/1.0.json");

        let targets = source(temp.path())
            .resolve_targets(&http, &ArtifactFetcher::new(), &version, temp.path())
            .unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "client");
    }

    #[test]
    fn test_resolve_targets_without_downloads_fails_item() {
        let temp = TempDir::new().unwrap();
        let http = MockHttpClient::new().with_body("http://meta.test/rd.json", r#"{"id": "rd"}"#);
        let version = JavaVersion::new("rd", "http://meta.test/rd.json");

        let err = source(temp.path())
            .resolve_targets(&http, &ArtifactFetcher::new(), &version, temp.path())
            .unwrap_err();

        assert!(matches!(err, DumperError::MetadataParse { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_version_dir_rejects_traversal() {
        let source = source(Path::new("java"));

        assert_eq!(
            source
                .version_dir(&JavaVersion::new("1.12.2", "http://x"))
                .unwrap(),
            Path::new("java").join("1.12.2")
        );
        assert!(source.version_dir(&JavaVersion::new("..", "http://x")).is_err());
    }
}
