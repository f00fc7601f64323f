//! CLI error type.

use std::fmt;

use mcdumper::config::ConfigFileError;
use mcdumper::logging::LoggingError;
use mcdumper::DumperError;

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid arguments or configuration values.
    Config(String),
    /// The configuration file could not be read or written.
    ConfigFile(ConfigFileError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// A mirror operation failed.
    Mirror(DumperError),
    /// The run finished but some sources or versions failed.
    Incomplete(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Mirror(e) => write!(f, "{}", e),
            CliError::Incomplete(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Mirror(e) => Some(e),
            CliError::Config(_) | CliError::Incomplete(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<DumperError> for CliError {
    fn from(e: DumperError) -> Self {
        CliError::Mirror(e)
    }
}
