//! The `check` command: show what `run` would download.

use clap::Args;
use mcdumper::logging;
use mcdumper::mirror::Mirror;
use mcdumper::source::ArtifactSource;

use super::common::{self, MirrorArgs};
use crate::error::CliError;

/// Arguments for `check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub mirror: MirrorArgs,
}

/// Print the diff for one source.
fn print_plan<S: ArtifactSource>(mirror: &Mirror, source: &S) -> Result<(), CliError> {
    let plan = mirror.plan(source)?;

    println!(
        "{}: {} in catalog, {} already present, {} missing",
        source.name(),
        plan.catalog_size,
        plan.already_present(),
        plan.missing.len()
    );
    for version in &plan.missing {
        println!("  + {}", version);
    }
    Ok(())
}

/// Run the dry-run diff.
pub fn run(args: CheckArgs, verbose: bool) -> Result<(), CliError> {
    let config = common::load_config()?;
    let mirror_config = common::resolve(&args.mirror, &config)?;
    let _guard = logging::init(verbose, None)?;

    let mirror = Mirror::from_config(&mirror_config)?;
    let mut failures = 0;

    if mirror_config.mcp_enabled {
        if let Err(e) = print_plan(&mirror, &mirror_config.mcp_source()) {
            eprintln!("mcp: {}", e);
            failures += 1;
        }
    }
    if mirror_config.java_enabled {
        if let Err(e) = print_plan(&mirror, &mirror_config.java_source()) {
            eprintln!("java: {}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(CliError::Incomplete(format!(
            "{} source(s) could not be checked",
            failures
        )));
    }
    Ok(())
}
