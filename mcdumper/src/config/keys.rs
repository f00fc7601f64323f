//! Typed configuration keys for `config get/set/list`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigFile, ConfigFileError};

/// A `section.key` configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GeneralOutputDir,
    GeneralParallelDownloads,
    GeneralTimeoutSecs,
    GeneralLogFile,
    JavaEnabled,
    JavaManifestUrl,
    McpEnabled,
    McpManifestUrl,
    McpDownloadBase,
}

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GeneralOutputDir,
            ConfigKey::GeneralParallelDownloads,
            ConfigKey::GeneralTimeoutSecs,
            ConfigKey::GeneralLogFile,
            ConfigKey::JavaEnabled,
            ConfigKey::JavaManifestUrl,
            ConfigKey::McpEnabled,
            ConfigKey::McpManifestUrl,
            ConfigKey::McpDownloadBase,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GeneralOutputDir => "general.output_dir",
            ConfigKey::GeneralParallelDownloads => "general.parallel_downloads",
            ConfigKey::GeneralTimeoutSecs => "general.timeout_secs",
            ConfigKey::GeneralLogFile => "general.log_file",
            ConfigKey::JavaEnabled => "java.enabled",
            ConfigKey::JavaManifestUrl => "java.manifest_url",
            ConfigKey::McpEnabled => "mcp.enabled",
            ConfigKey::McpManifestUrl => "mcp.manifest_url",
            ConfigKey::McpDownloadBase => "mcp.download_base",
        }
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        self.split().0
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        self.name().split_once('.').unwrap_or(("", self.name()))
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GeneralOutputDir => path_string(&config.general.output_dir),
            ConfigKey::GeneralParallelDownloads => config.general.parallel_downloads.to_string(),
            ConfigKey::GeneralTimeoutSecs => config.general.timeout_secs.to_string(),
            ConfigKey::GeneralLogFile => path_string(&config.general.log_file),
            ConfigKey::JavaEnabled => config.java.enabled.to_string(),
            ConfigKey::JavaManifestUrl => config.java.manifest_url.clone(),
            ConfigKey::McpEnabled => config.mcp.enabled.to_string(),
            ConfigKey::McpManifestUrl => config.mcp.manifest_url.clone(),
            ConfigKey::McpDownloadBase => config.mcp.download_base.clone(),
        }
    }

    /// Validate `value` and store it. An empty value clears optional paths.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        let value = value.trim();
        match self {
            ConfigKey::GeneralOutputDir => config.general.output_dir = optional_path(value),
            ConfigKey::GeneralParallelDownloads => {
                config.general.parallel_downloads = self.positive(value)? as usize
            }
            ConfigKey::GeneralTimeoutSecs => config.general.timeout_secs = self.positive(value)?,
            ConfigKey::GeneralLogFile => config.general.log_file = optional_path(value),
            ConfigKey::JavaEnabled => config.java.enabled = self.boolean(value)?,
            ConfigKey::JavaManifestUrl => config.java.manifest_url = self.url(value)?,
            ConfigKey::McpEnabled => config.mcp.enabled = self.boolean(value)?,
            ConfigKey::McpManifestUrl => config.mcp.manifest_url = self.url(value)?,
            ConfigKey::McpDownloadBase => config.mcp.download_base = self.url(value)?,
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn positive(&self, value: &str) -> Result<u64, ConfigFileError> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(self.invalid(value, "expected a positive integer")),
        }
    }

    fn boolean(&self, value: &str) -> Result<bool, ConfigFileError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn url(&self, value: &str) -> Result<String, ConfigFileError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(value.to_string())
        } else {
            Err(self.invalid(value, "expected an http:// or https:// URL"))
        }
    }
}

fn path_string(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConfigKey(pub String);

impl fmt::Display for UnknownConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown configuration key '{}'", self.0)
    }
}

impl std::error::Error for UnknownConfigKey {}

impl FromStr for ConfigKey {
    type Err = UnknownConfigKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownConfigKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "MCP.Download_Base".parse::<ConfigKey>().unwrap(),
            ConfigKey::McpDownloadBase
        );
        assert!("general.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_section_and_key_name() {
        assert_eq!(ConfigKey::GeneralTimeoutSecs.section(), "general");
        assert_eq!(ConfigKey::GeneralTimeoutSecs.key_name(), "timeout_secs");
        assert_eq!(ConfigKey::McpDownloadBase.section(), "mcp");
    }

    #[test]
    fn test_set_then_get() {
        let mut config = ConfigFile::default();

        ConfigKey::GeneralParallelDownloads.set(&mut config, "8").unwrap();
        ConfigKey::JavaEnabled.set(&mut config, "no").unwrap();
        ConfigKey::GeneralOutputDir.set(&mut config, "/srv/mirror").unwrap();

        assert_eq!(ConfigKey::GeneralParallelDownloads.get(&config), "8");
        assert_eq!(ConfigKey::JavaEnabled.get(&config), "false");
        assert_eq!(ConfigKey::GeneralOutputDir.get(&config), "/srv/mirror");
    }

    #[test]
    fn test_empty_value_clears_optional_path() {
        let mut config = ConfigFile::default();
        ConfigKey::GeneralLogFile.set(&mut config, "/tmp/x.log").unwrap();

        ConfigKey::GeneralLogFile.set(&mut config, "").unwrap();

        assert!(config.general.log_file.is_none());
        assert_eq!(ConfigKey::GeneralLogFile.get(&config), "");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::GeneralParallelDownloads.set(&mut config, "0").is_err());
        assert!(ConfigKey::GeneralTimeoutSecs.set(&mut config, "-5").is_err());
        assert!(ConfigKey::McpEnabled.set(&mut config, "maybe").is_err());
        assert!(ConfigKey::JavaManifestUrl.set(&mut config, "ftp://x").is_err());
        assert_eq!(config, ConfigFile::default());
    }
}
