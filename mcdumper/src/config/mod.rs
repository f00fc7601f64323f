//! User configuration stored in `config.ini`.
//!
//! Values here sit between command-line flags and built-in defaults: a flag
//! always wins, an unset setting falls back to the default.

mod file;
mod keys;

use std::path::PathBuf;

pub use file::{ConfigFile, ConfigFileError, GeneralSettings, JavaSettings, McpSettings, LOG_FILENAME};
pub use keys::{ConfigKey, UnknownConfigKey};

/// Directory holding the configuration file.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mcdumper")
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("mcdumper/config.ini"));
    }
}
