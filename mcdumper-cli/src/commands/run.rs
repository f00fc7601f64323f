//! The `run` command: mirror every selected source.

use clap::Args;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mcdumper::logging;
use mcdumper::mirror::{Mirror, MirrorProgress, SourceOutcome};
use tracing::info;

use super::common::{self, MirrorArgs};
use crate::error::CliError;

/// Arguments for `run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub mirror: MirrorArgs,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,
}

/// Progress bar ticking once per processed version.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template(
            "{spinner:.green} {prefix:>4} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(style);
        Self { bar }
    }
}

impl MirrorProgress for BarProgress {
    fn planned(&self, source: &str, missing: usize) {
        self.bar.reset();
        self.bar.set_prefix(source.to_string());
        self.bar.set_length(missing as u64);
        self.bar.set_message("");
    }

    fn item_done(&self, _source: &str, label: &str, success: bool) {
        if !success {
            self.bar.println(format!("  failed: {}", label));
        }
        self.bar.set_message(label.to_string());
        self.bar.inc(1);
    }
}

/// Print per-source summaries and return how many sources did not finish
/// cleanly.
fn print_summary(outcomes: &[SourceOutcome]) -> usize {
    println!();
    println!("Summary");
    println!("=======");

    let mut unclean = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                println!("{}", report);
                for failure in &report.failed {
                    println!("  ✗ {}: {}", failure.label, failure.reason);
                }
            }
            Err(e) => println!("{}: aborted: {}", outcome.source, e),
        }
        if !outcome.is_success() {
            unclean += 1;
        }
    }
    unclean
}

/// Run the mirror.
pub fn run(args: RunArgs, verbose: bool) -> Result<(), CliError> {
    let config = common::load_config()?;
    let mirror_config = common::resolve(&args.mirror, &config)?;

    let log_file = (!args.no_log_file).then(|| config.log_file(&mirror_config.output_dir));
    let _guard = logging::init(verbose, log_file.as_deref())?;

    info!(
        output = %mirror_config.output_dir.display(),
        parallel = mirror_config.parallel_downloads,
        timeout_secs = mirror_config.timeout.as_secs(),
        "Starting mcdumper"
    );

    let mirror = Mirror::from_config(&mirror_config)?;
    let progress = BarProgress::new();
    let outcomes = mirror.run_all(&mirror_config, &progress);
    progress.bar.finish_and_clear();

    let unclean = print_summary(&outcomes);
    if unclean > 0 {
        return Err(CliError::Incomplete(format!(
            "{} of {} sources did not complete cleanly",
            unclean,
            outcomes.len()
        )));
    }
    Ok(())
}
