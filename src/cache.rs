//! On-disk binary cache.
//!
//! Every resolved `(owner, repo, version)` triple owns one directory under
//! `~/.ghrun/cache/`, holding the raw downloaded asset under its original
//! filename, a `bin/` extraction directory, and two plain-text marker files:
//!
//! - `.binary_path` holds the final resolved executable for the whole entry
//! - `.extracted_binary_path` holds the executable found inside the extraction
//!
//! A marker is trusted only while the path it names still exists and is
//! executable; an invalid marker just means that stage is redone. Together
//! with the raw-asset check this gives three independent memoization levels.
//! Entries are never expired or garbage-collected, and concurrent
//! invocations are not coordinated.

use crate::error::Result;
use crate::locate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const BINARY_MARKER: &str = ".binary_path";
const EXTRACTED_MARKER: &str = ".extracted_binary_path";
const EXTRACT_DIR: &str = "bin";

/// Identifies one cache entry. `version` is always a resolved tag, never
/// `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub version: String,
}

impl CacheKey {
    pub fn new(owner: &str, repo: &str, version: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            version: version.to_string(),
        }
    }

    fn dir_name(&self) -> String {
        format!("{}_{}_{}", self.owner, self.repo, self.version)
    }
}

/// Cache interface injected into the pipeline, so tests can point it at a
/// temporary root.
pub trait CacheStore {
    /// Directory owned by this key.
    fn entry_dir(&self, key: &CacheKey) -> PathBuf;

    /// Where the raw asset is stored for this key.
    fn asset_path(&self, key: &CacheKey, asset_name: &str) -> PathBuf;

    /// The raw asset, if already on disk with nonzero size.
    fn cached_asset(&self, key: &CacheKey, asset_name: &str) -> Option<PathBuf>;

    /// Directory archives are extracted into.
    fn extraction_dir(&self, key: &CacheKey) -> PathBuf;

    /// The whole-entry resolved executable, if its marker is still valid.
    fn resolved_binary(&self, key: &CacheKey) -> Option<PathBuf>;

    fn record_resolved_binary(&self, key: &CacheKey, binary: &Path) -> Result<()>;

    /// The extracted executable, if its marker is still valid.
    fn extracted_binary(&self, key: &CacheKey) -> Option<PathBuf>;

    fn record_extracted_binary(&self, key: &CacheKey, binary: &Path) -> Result<()>;
}

/// The production cache, rooted at `~/.ghrun/cache`.
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            root: PathBuf::from(home).join(".ghrun").join("cache"),
        }
    }

    /// Cache rooted at an arbitrary directory. Used by tests.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_marker(&self, key: &CacheKey, marker: &str) -> Option<PathBuf> {
        let marker_path = self.entry_dir(key).join(marker);
        let contents = fs::read_to_string(&marker_path).ok()?;
        let binary = PathBuf::from(contents.trim());

        if locate::is_executable(&binary) {
            Some(binary)
        } else {
            debug!(marker = %marker_path.display(), "stale cache marker, stage will be redone");
            None
        }
    }

    fn write_marker(&self, key: &CacheKey, marker: &str, binary: &Path) -> Result<()> {
        let dir = self.entry_dir(key);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(marker), binary.display().to_string())?;
        Ok(())
    }
}

impl Default for DiskCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for DiskCache {
    fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.dir_name())
    }

    fn asset_path(&self, key: &CacheKey, asset_name: &str) -> PathBuf {
        self.entry_dir(key).join(asset_name)
    }

    fn cached_asset(&self, key: &CacheKey, asset_name: &str) -> Option<PathBuf> {
        let path = self.asset_path(key, asset_name);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => Some(path),
            _ => None,
        }
    }

    fn extraction_dir(&self, key: &CacheKey) -> PathBuf {
        self.entry_dir(key).join(EXTRACT_DIR)
    }

    fn resolved_binary(&self, key: &CacheKey) -> Option<PathBuf> {
        self.read_marker(key, BINARY_MARKER)
    }

    fn record_resolved_binary(&self, key: &CacheKey, binary: &Path) -> Result<()> {
        self.write_marker(key, BINARY_MARKER, binary)
    }

    fn extracted_binary(&self, key: &CacheKey) -> Option<PathBuf> {
        self.read_marker(key, EXTRACTED_MARKER)
    }

    fn record_extracted_binary(&self, key: &CacheKey, binary: &Path) -> Result<()> {
        self.write_marker(key, EXTRACTED_MARKER, binary)
    }
}
