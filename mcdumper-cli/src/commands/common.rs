//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};
use mcdumper::config::ConfigFile;
use mcdumper::mirror::MirrorConfig;

use crate::error::CliError;

/// Artifact source selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SourceArg {
    /// Both jars and mappings
    All,
    /// Client and server jars
    Java,
    /// MCP mapping archives
    Mcp,
}

/// Options shared by `run` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct MirrorArgs {
    /// Which sources to process (default: those enabled in config.ini)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Output directory holding the java/ and mcp/ trees
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Versions processed concurrently (1 = sequential)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Load the configuration file.
pub fn load_config() -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load()?)
}

/// Build the mirror configuration: flags, then config file, then defaults.
pub fn resolve(args: &MirrorArgs, config: &ConfigFile) -> Result<MirrorConfig, CliError> {
    let mut mirror = config.to_mirror_config();

    if let Some(output) = &args.output {
        mirror.output_dir = output.clone();
    }
    if let Some(parallel) = args.parallel {
        if parallel == 0 {
            return Err(CliError::Config(
                "--parallel must be at least 1".to_string(),
            ));
        }
        mirror.parallel_downloads = parallel;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err(CliError::Config("--timeout must be at least 1".to_string()));
        }
        mirror.timeout = Duration::from_secs(timeout);
    }
    match args.source {
        Some(SourceArg::All) => {
            mirror.java_enabled = true;
            mirror.mcp_enabled = true;
        }
        Some(SourceArg::Java) => {
            mirror.java_enabled = true;
            mirror.mcp_enabled = false;
        }
        Some(SourceArg::Mcp) => {
            mirror.java_enabled = false;
            mirror.mcp_enabled = true;
        }
        None => {}
    }

    if !mirror.java_enabled && !mirror.mcp_enabled {
        return Err(CliError::Config(
            "No sources enabled. Use --source or enable java/mcp in config.ini.".to_string(),
        ));
    }

    Ok(mirror)
}
