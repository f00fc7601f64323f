//! Local manifest of already-mirrored versions.
//!
//! The manifest is the idempotence anchor: a version is listed only after all
//! of its artifacts were written. Absence of the file means "nothing mirrored
//! yet"; a present but unparsable file is an error and is never silently reset.
//!
//! Two JSON encodings are supported:
//!
//! ```text
//! flat:    ["1.12.2", "1.13", "19w14a"]
//! nested:  { "1.12.2": { "snapshot": ["20180814"], "stable": ["39"] } }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DumperError, DumperResult};

/// Manifest filename inside each source root.
pub const MANIFEST_FILENAME: &str = "versions.json";

/// Nested manifest shape: group -> kind -> releases.
pub type NestedVersions = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Loads and saves a source's manifest file.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Create a store for the manifest at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the default manifest file inside `root`.
    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join(MANIFEST_FILENAME))
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the manifest file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the manifest, decoding its contents with `decode`.
    ///
    /// A missing file yields an empty set. Decode failures are reported as
    /// [`DumperError::ManifestParse`] for this file.
    pub fn load<K, F>(&self, decode: F) -> DumperResult<BTreeSet<K>>
    where
        K: Ord,
        F: FnOnce(&str) -> Result<BTreeSet<K>, String>,
    {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => {
                return Err(DumperError::ManifestRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        decode(&content).map_err(|reason| DumperError::ManifestParse {
            path: self.path.clone(),
            reason,
        })
    }

    /// Persist `content`, replacing the previous manifest atomically.
    ///
    /// The content is written to a sibling temporary file which is then
    /// renamed over the manifest, so a crash never leaves a truncated file.
    pub fn save(&self, content: &str) -> DumperResult<()> {
        let write_err = |source: io::Error| DumperError::ManifestWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp).map_err(write_err)?;
            file.write_all(content.as_bytes()).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| {
            fs::remove_file(&tmp).ok();
            write_err(e)
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| MANIFEST_FILENAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Encode a flat set of identifiers as a pretty-printed JSON array.
pub fn encode_flat(ids: &BTreeSet<String>) -> DumperResult<String> {
    Ok(serde_json::to_string_pretty(ids)?)
}

/// Decode a flat JSON array of identifiers.
pub fn decode_flat(content: &str) -> Result<BTreeSet<String>, String> {
    serde_json::from_str::<Vec<String>>(content)
        .map(|ids| ids.into_iter().collect())
        .map_err(|e| e.to_string())
}

/// Encode nested `group -> kind -> releases` data as pretty-printed JSON.
///
/// Releases are sorted within each kind.
pub fn encode_nested(mut versions: NestedVersions) -> DumperResult<String> {
    for kinds in versions.values_mut() {
        for releases in kinds.values_mut() {
            releases.sort();
            releases.dedup();
        }
    }
    Ok(serde_json::to_string_pretty(&versions)?)
}

/// Decode nested `group -> kind -> releases` JSON.
///
/// Releases may be JSON strings or numbers; both are normalized to strings.
pub fn decode_nested(content: &str) -> Result<NestedVersions, String> {
    let raw: BTreeMap<String, BTreeMap<String, Vec<ReleaseValue>>> =
        serde_json::from_str(content).map_err(|e| e.to_string())?;

    Ok(raw
        .into_iter()
        .map(|(group, kinds)| {
            let kinds = kinds
                .into_iter()
                .map(|(kind, releases)| {
                    (kind, releases.into_iter().map(ReleaseValue::into_string).collect())
                })
                .collect();
            (group, kinds)
        })
        .collect())
}

/// A release identifier as it appears in JSON.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReleaseValue {
    Text(String),
    Number(serde_json::Number),
}

impl ReleaseValue {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}
