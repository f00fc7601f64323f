//! Configuration for a mirror run.

use std::path::PathBuf;
use std::time::Duration;

use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::source::{java, mcp, JavaSource, McpSource};

/// Default number of versions processed concurrently.
pub const DEFAULT_PARALLEL_DOWNLOADS: usize = 4;

/// Configuration for a mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Directory holding one root per source (`java/`, `mcp/`).
    pub output_dir: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Number of versions processed concurrently.
    ///
    /// `1` or less processes versions one at a time.
    pub parallel_downloads: usize,

    /// Whether the jar source is mirrored.
    pub java_enabled: bool,

    /// Catalog URL for the jar source.
    pub java_manifest_url: String,

    /// Whether the mapping source is mirrored.
    pub mcp_enabled: bool,

    /// Catalog URL for the mapping source.
    pub mcp_manifest_url: String,

    /// Base URL mapping archives are served from.
    pub mcp_download_base: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
            java_enabled: true,
            java_manifest_url: java::DEFAULT_MANIFEST_URL.to_string(),
            mcp_enabled: true,
            mcp_manifest_url: mcp::DEFAULT_MANIFEST_URL.to_string(),
            mcp_download_base: mcp::DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }
}

impl MirrorConfig {
    /// Create a new configuration writing below `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of versions processed concurrently.
    pub fn with_parallel_downloads(mut self, parallel: usize) -> Self {
        self.parallel_downloads = parallel;
        self
    }

    /// Enable or disable the jar source.
    pub fn with_java(mut self, enabled: bool) -> Self {
        self.java_enabled = enabled;
        self
    }

    /// Enable or disable the mapping source.
    pub fn with_mcp(mut self, enabled: bool) -> Self {
        self.mcp_enabled = enabled;
        self
    }

    /// Set the jar catalog URL.
    pub fn with_java_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.java_manifest_url = url.into();
        self
    }

    /// Set the mapping catalog URL.
    pub fn with_mcp_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.mcp_manifest_url = url.into();
        self
    }

    /// Set the mapping archive base URL.
    pub fn with_mcp_download_base(mut self, base: impl Into<String>) -> Self {
        self.mcp_download_base = base.into();
        self
    }

    /// The jar source described by this configuration.
    pub fn java_source(&self) -> JavaSource {
        JavaSource::new(self.output_dir.join("java"))
            .with_manifest_url(self.java_manifest_url.clone())
    }

    /// The mapping source described by this configuration.
    pub fn mcp_source(&self) -> McpSource {
        McpSource::new(self.output_dir.join("mcp"))
            .with_manifest_url(self.mcp_manifest_url.clone())
            .with_download_base(self.mcp_download_base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ArtifactSource;

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.parallel_downloads, 4);
        assert!(config.java_enabled);
        assert!(config.mcp_enabled);
        assert_eq!(config.mcp_download_base, "http://export.mcpbot.bspk.rs");
    }

    #[test]
    fn test_builder_pattern() {
        let config = MirrorConfig::new("/srv/mirror")
            .with_timeout(Duration::from_secs(10))
            .with_parallel_downloads(8)
            .with_java(false)
            .with_mcp_manifest_url("http://mcp.test/versions.json")
            .with_mcp_download_base("http://mcp.test");

        assert_eq!(config.output_dir, PathBuf::from("/srv/mirror"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.parallel_downloads, 8);
        assert!(!config.java_enabled);
        assert_eq!(config.mcp_manifest_url, "http://mcp.test/versions.json");
    }

    #[test]
    fn test_source_roots() {
        let config = MirrorConfig::new("/srv/mirror").with_java_manifest_url("http://meta.test/m.json");

        let java = config.java_source();
        assert_eq!(java.root(), PathBuf::from("/srv/mirror/java"));
        assert_eq!(java.manifest_url(), "http://meta.test/m.json");
        assert_eq!(config.mcp_source().root(), PathBuf::from("/srv/mirror/mcp"));
    }
}
