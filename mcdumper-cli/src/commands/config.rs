//! Configuration management CLI commands.
//!
//! `config get`, `config set`, `config list` and `config path` view and edit
//! `config.ini` without opening it.

use clap::Subcommand;
use mcdumper::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., general.output_dir)
        key: String,
    },

    /// Set a configuration value (an empty value clears optional paths)
    Set {
        /// Configuration key in format section.key (e.g., mcp.enabled)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'mcdumper config list' to see available keys.",
            key
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn run_get(key: &str) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let config = ConfigFile::load()?;

    println!("{}", display_value(&key.get(&config)));
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let mut config = ConfigFile::load()?;

    key.set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save()?;

    println!("Set {} = {}", key, display_value(&key.get(&config)));
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");

    let mut current_section = "";
    for key in ConfigKey::all() {
        if key.section() != current_section {
            println!();
            println!("[{}]", key.section());
            current_section = key.section();
        }
        println!("  {} = {}", key.key_name(), display_value(&key.get(&config)));
    }
    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_unknown() {
        let err = parse_key("general.colour").unwrap_err();
        assert!(err.to_string().contains("mcdumper config list"));
    }

    #[test]
    fn test_display_value_unset() {
        assert_eq!(display_value(""), "(not set)");
        assert_eq!(display_value("4"), "4");
    }
}
