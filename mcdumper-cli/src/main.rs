//! mcdumper CLI - command-line interface
//!
//! Mirrors Minecraft client/server jars and MCP mapping archives into a local
//! directory, downloading only what previous runs have not.

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::check::CheckArgs;
use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "mcdumper", version, about, long_about = None)]
struct Cli {
    /// Enable debug output on the console
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download every version missing from the local mirror
    Run(RunArgs),

    /// List versions missing from the local mirror without downloading
    Check(CheckArgs),

    /// View or edit config.ini
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Check(args) => commands::check::run(args, cli.verbose),
        Commands::Config { action } => commands::config::run(action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
