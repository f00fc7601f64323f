//! Run reports.

use std::error::Error;
use std::fmt;

use crate::error::DumperError;

/// A version that could not be mirrored this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Version label.
    pub label: String,
    /// Error message, including its causes.
    pub reason: String,
}

impl ItemFailure {
    /// Build a failure entry from an error and its source chain.
    pub fn new(label: impl Into<String>, err: &DumperError) -> Self {
        let mut reason = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !reason.contains(&cause_text) {
                reason.push_str(": ");
                reason.push_str(&cause_text);
            }
            source = cause.source();
        }
        Self {
            label: label.into(),
            reason,
        }
    }
}

/// Summary of one source's run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Source name.
    pub source: String,
    /// Distinct versions in the remote catalog.
    pub catalog_size: usize,
    /// Catalog versions already present in the local manifest.
    pub already_present: usize,
    /// Versions mirrored this run, sorted.
    pub completed: Vec<String>,
    /// Versions that failed this run, sorted by label.
    pub failed: Vec<ItemFailure>,
}

impl RunReport {
    /// Whether every missing version was mirrored.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} in catalog, {} already present, {} downloaded, {} failed",
            self.source,
            self.catalog_size,
            self.already_present,
            self.completed.len(),
            self.failed.len()
        )
    }
}

/// Outcome of one source within a process-wide run.
#[derive(Debug)]
pub struct SourceOutcome {
    /// Source name.
    pub source: String,
    /// The run report, or the error that aborted the source.
    pub result: Result<RunReport, DumperError>,
}

impl SourceOutcome {
    /// Whether the source ran to completion without item failures.
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_success())
    }
}
