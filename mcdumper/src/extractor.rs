//! Archive expansion for downloaded mapping archives.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{DumperError, DumperResult};
use crate::fetch::ensure_dir;

/// Trait for archive expansion.
pub trait ArchiveExtractor: Send + Sync {
    /// Expand every entry of `archive_path` into `dest_dir`.
    ///
    /// Returns the number of files written.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> DumperResult<usize>;
}

/// Zip archive extractor.
///
/// Entry names are resolved relative to the destination; entries that would
/// land outside it (absolute paths, `..` components) abort the extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new zip extractor.
    pub fn new() -> Self {
        Self
    }

    fn extract_zip(&self, archive_path: &Path, dest_dir: &Path) -> DumperResult<usize> {
        let failed = |reason: String| DumperError::ExtractionFailed {
            path: archive_path.to_path_buf(),
            reason,
        };

        let file = File::open(archive_path).map_err(|e| DumperError::ReadFailed {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| failed(e.to_string()))?;

        ensure_dir(dest_dir)?;

        let mut written = 0;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| failed(e.to_string()))?;

            let relative = entry
                .enclosed_name()
                .ok_or_else(|| DumperError::UnsafeArchiveEntry {
                    archive: archive_path.to_path_buf(),
                    entry: entry.name().to_string(),
                })?;
            let out_path = dest_dir.join(relative);

            if entry.is_dir() {
                ensure_dir(&out_path)?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                ensure_dir(parent)?;
            }

            let write_err = |source: io::Error| DumperError::WriteFailed {
                path: out_path.clone(),
                source,
            };
            let out = File::create(&out_path).map_err(write_err)?;
            let mut writer = BufWriter::new(out);
            io::copy(&mut entry, &mut writer).map_err(|e| {
                if e.kind() == io::ErrorKind::InvalidData {
                    failed(format!("entry {}: {}", entry.name(), e))
                } else {
                    write_err(e)
                }
            })?;
            writer.flush().map_err(write_err)?;

            written += 1;
        }

        debug!(archive = %archive_path.display(), files = written, "Archive expanded");
        Ok(written)
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> DumperResult<usize> {
        self.extract_zip(archive_path, dest_dir)
    }
}
