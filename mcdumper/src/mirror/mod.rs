//! Mirror orchestration.
//!
//! A run for one source loads the local manifest, fetches the remote
//! catalog, diffs the two and processes every missing version with the
//! configured strategy. Versions enter the manifest only once all of their
//! artifacts were written and expanded; the manifest is persisted after
//! every worker has finished.
//!
//! # Example
//!
//! ```ignore
//! use mcdumper::mirror::{Mirror, MirrorConfig};
//!
//! let config = MirrorConfig::new("/srv/mirror").with_parallel_downloads(8);
//! let mirror = Mirror::from_config(&config)?;
//! for outcome in mirror.run_all(&config, &()) {
//!     println!("{}: {:?}", outcome.source, outcome.result);
//! }
//! ```

mod config;
mod report;
mod strategy;

pub use config::{MirrorConfig, DEFAULT_PARALLEL_DOWNLOADS};
pub use report::{ItemFailure, RunReport, SourceOutcome};
pub use strategy::{FetchStrategy, ItemOutcome, ParallelStrategy, SequentialStrategy};

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::diff;
use crate::error::{DumperError, DumperResult};
use crate::extractor::{ArchiveExtractor, ZipExtractor};
use crate::fetch::{ensure_dir, ArtifactFetcher};
use crate::http::{HttpClient, ReqwestClient};
use crate::source::{ArtifactSource, VersionDescriptor};

/// Receives progress notifications during a run.
///
/// Calls may arrive from worker threads.
pub trait MirrorProgress: Sync {
    /// The diff for `source` found `missing` versions to process.
    fn planned(&self, _source: &str, _missing: usize) {}

    /// One version of `source` finished, successfully or not.
    fn item_done(&self, _source: &str, _label: &str, _success: bool) {}
}

/// No-op progress sink.
impl MirrorProgress for () {}

/// What a run would do, computed without downloading anything.
#[derive(Debug, Clone)]
pub struct MirrorPlan<D: VersionDescriptor> {
    /// Keys currently recorded in the local manifest.
    pub local: BTreeSet<D::Key>,
    /// Distinct versions in the remote catalog.
    pub catalog_size: usize,
    /// Versions to process, sorted by key.
    pub missing: Vec<D>,
}

impl<D: VersionDescriptor> MirrorPlan<D> {
    /// Catalog versions already present locally.
    pub fn already_present(&self) -> usize {
        self.catalog_size - self.missing.len()
    }
}

/// Mirrors artifact sources into their local roots.
pub struct Mirror {
    http: Arc<dyn HttpClient>,
    extractor: Arc<dyn ArchiveExtractor>,
    fetcher: ArtifactFetcher,
    parallel_downloads: usize,
}

impl Mirror {
    /// Create a mirror using `http` for all requests.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            extractor: Arc::new(ZipExtractor::new()),
            fetcher: ArtifactFetcher::new(),
            parallel_downloads: DEFAULT_PARALLEL_DOWNLOADS,
        }
    }

    /// Create a mirror with a real HTTP client configured from `config`.
    pub fn from_config(config: &MirrorConfig) -> DumperResult<Self> {
        let http = ReqwestClient::with_timeout(config.timeout)
            .map_err(|e| DumperError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(Arc::new(http)).with_parallel_downloads(config.parallel_downloads))
    }

    /// Set the number of versions processed concurrently.
    pub fn with_parallel_downloads(mut self, parallel: usize) -> Self {
        self.parallel_downloads = parallel;
        self
    }

    /// Use a different archive extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Number of versions processed concurrently.
    pub fn parallel_downloads(&self) -> usize {
        self.parallel_downloads
    }

    /// Load the manifest, fetch the catalog and diff them.
    ///
    /// # Errors
    ///
    /// Manifest and catalog errors; all are fatal for the source.
    pub fn plan<S: ArtifactSource>(&self, source: &S) -> DumperResult<MirrorPlan<S::Descriptor>> {
        let local = source
            .manifest()
            .load(|content| source.decode_manifest(content))?;
        let remote = source.fetch_catalog(self.http.as_ref())?;

        let catalog_size = remote
            .iter()
            .map(|v| v.key())
            .collect::<BTreeSet<_>>()
            .len();
        let missing = diff::missing(&remote, &local);

        debug!(
            source = source.name(),
            local = local.len(),
            remote = catalog_size,
            missing = missing.len(),
            "Diffed catalog against manifest"
        );

        Ok(MirrorPlan {
            local,
            catalog_size,
            missing,
        })
    }

    /// Mirror every version of `source` not yet in its manifest.
    ///
    /// Item failures are collected into the report and retried on the next
    /// run. The manifest is written when something completed or when it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Manifest and catalog errors; they abort the run for this source.
    pub fn run<S: ArtifactSource>(
        &self,
        source: &S,
        progress: &dyn MirrorProgress,
    ) -> DumperResult<RunReport> {
        let name = source.name();
        let plan = self.plan(source)?;
        let already_present = plan.already_present();
        let MirrorPlan {
            mut local,
            catalog_size,
            missing,
        } = plan;

        info!(
            source = name,
            catalog = catalog_size,
            present = already_present,
            missing = missing.len(),
            "Starting mirror run"
        );
        progress.planned(name, missing.len());

        let work = |version: &S::Descriptor| self.mirror_item(source, version);
        let on_done = |outcome: &ItemOutcome<S::Descriptor>| {
            progress.item_done(name, &outcome.item.to_string(), outcome.result.is_ok());
        };
        let outcomes = if self.parallel_downloads <= 1 {
            SequentialStrategy::new().execute(missing, work, on_done)
        } else {
            ParallelStrategy::new(self.parallel_downloads).execute(missing, work, on_done)
        };

        let mut completed = Vec::new();
        let mut failed = Vec::new();
        for ItemOutcome { item, result } in outcomes {
            match result {
                Ok(()) => {
                    completed.push(item.to_string());
                    local.insert(item.key());
                }
                Err(e) => {
                    warn!(source = name, version = %item, error = %e, "Version failed");
                    failed.push(ItemFailure::new(item.to_string(), &e));
                }
            }
        }
        completed.sort();
        failed.sort_by(|a, b| a.label.cmp(&b.label));

        let store = source.manifest();
        if !completed.is_empty() || !store.exists() {
            store.save(&source.encode_manifest(&local)?)?;
            debug!(source = name, path = %store.path().display(), "Manifest saved");
        }

        let report = RunReport {
            source: name.to_string(),
            catalog_size,
            already_present,
            completed,
            failed,
        };
        info!(
            source = name,
            downloaded = report.completed.len(),
            failed = report.failed.len(),
            "Mirror run finished"
        );
        Ok(report)
    }

    /// Download and expand one version into its directory.
    pub fn mirror_item<S: ArtifactSource>(
        &self,
        source: &S,
        version: &S::Descriptor,
    ) -> DumperResult<()> {
        info!(source = source.name(), version = %version, "Downloading");

        let dir = source.version_dir(version)?;
        ensure_dir(&dir)?;

        let targets = source.resolve_targets(self.http.as_ref(), &self.fetcher, version, &dir)?;
        for target in &targets {
            let bytes = self.fetcher.fetch(self.http.as_ref(), target)?;
            debug!(version = %version, artifact = %target.name, bytes, "Artifact written");

            if target.archive {
                let files = self.extractor.extract(&target.path, &dir)?;
                debug!(version = %version, artifact = %target.name, files, "Archive expanded");
            }
        }
        Ok(())
    }

    /// Run every source enabled in `config`, mappings first.
    ///
    /// Sources are independent: a fatal error in one is reported in its
    /// outcome and does not stop the next.
    pub fn run_all(
        &self,
        config: &MirrorConfig,
        progress: &dyn MirrorProgress,
    ) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::new();

        if config.mcp_enabled {
            let source = config.mcp_source();
            outcomes.push(self.outcome(&source, progress));
        }
        if config.java_enabled {
            let source = config.java_source();
            outcomes.push(self.outcome(&source, progress));
        }

        outcomes
    }

    fn outcome<S: ArtifactSource>(&self, source: &S, progress: &dyn MirrorProgress) -> SourceOutcome {
        let result = self.run(source, progress);
        if let Err(ref e) = result {
            warn!(source = source.name(), error = %e, "Source run aborted");
        }
        SourceOutcome {
            source: source.name().to_string(),
            result,
        }
    }
}
