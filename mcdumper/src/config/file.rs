//! Persistent INI configuration.
//!
//! ```ini
//! [general]
//! output_dir = /srv/mirror
//! parallel_downloads = 4
//! timeout_secs = 60
//! log_file = /var/log/mcdumper.log
//!
//! [java]
//! enabled = true
//! manifest_url = https://launchermeta.mojang.com/mc/game/version_manifest.json
//!
//! [mcp]
//! enabled = true
//! manifest_url = http://export.mcpbot.bspk.rs/versions.json
//! download_base = http://export.mcpbot.bspk.rs
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::mirror::{MirrorConfig, DEFAULT_PARALLEL_DOWNLOADS};
use crate::source::{java, mcp};

/// Filename of the default log file inside the output directory.
pub const LOG_FILENAME: &str = "mcdumper.log";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read or written.
    #[error("config file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The file is not valid INI.
    #[error("failed to parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A setting has a value of the wrong shape.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[general]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Mirror output directory; the working directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Number of versions processed concurrently.
    pub parallel_downloads: usize,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Log file; `<output_dir>/mcdumper.log` when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
        }
    }
}

/// `[java]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaSettings {
    pub enabled: bool,
    pub manifest_url: String,
}

impl Default for JavaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest_url: java::DEFAULT_MANIFEST_URL.to_string(),
        }
    }
}

/// `[mcp]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpSettings {
    pub enabled: bool,
    pub manifest_url: String,
    pub download_base: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest_url: mcp::DEFAULT_MANIFEST_URL.to_string(),
            download_base: mcp::DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub general: GeneralSettings,
    pub java: JavaSettings,
    pub mcp: McpSettings,
}

impl ConfigFile {
    /// Load from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&super::config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigFileError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let ini = Ini::load_from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&super::config_file_path())
    }

    /// Save to `path`, creating its directory. Unset optional values are
    /// omitted.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let io_err = |source: io::Error| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        ini.write_to_file(path).map_err(io_err)
    }

    /// Output directory, defaulting to the working directory.
    pub fn output_dir(&self) -> PathBuf {
        self.general
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Log file path for a run writing to `output_dir`.
    pub fn log_file(&self, output_dir: &Path) -> PathBuf {
        self.general
            .log_file
            .clone()
            .unwrap_or_else(|| output_dir.join(LOG_FILENAME))
    }

    /// Mirror configuration described by this file.
    pub fn to_mirror_config(&self) -> MirrorConfig {
        MirrorConfig::new(self.output_dir())
            .with_timeout(Duration::from_secs(self.general.timeout_secs))
            .with_parallel_downloads(self.general.parallel_downloads)
            .with_java(self.java.enabled)
            .with_java_manifest_url(self.java.manifest_url.clone())
            .with_mcp(self.mcp.enabled)
            .with_mcp_manifest_url(self.mcp.manifest_url.clone())
            .with_mcp_download_base(self.mcp.download_base.clone())
    }
}
