//! On-disk status cache for one site
//!
//! The cache is a single JSON object mapping URL to `StatusRecord`. It is read
//! once when reconciliation starts and rewritten in full when it ends.

use crate::cache::StatusRecord;
use crate::{CacheError, CacheResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// URL to last observed status
pub type StatusMap = BTreeMap<String, StatusRecord>;

/// Reads a status map from `path`
///
/// # Returns
///
/// * `Ok(StatusMap)` - The stored mapping, or an empty one if the file does not exist
/// * `Err(CacheError::Corrupt)` - The file exists but is not a valid status map
/// * `Err(CacheError::Io)` - The file exists but could not be read
pub fn load(path: &Path) -> CacheResult<StatusMap> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StatusMap::new()),
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| CacheError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a status map to `path`, replacing any previous file
///
/// The map is written to a sibling temporary file first and then renamed
/// over the target, so a valid previous file is never left half-written.
pub fn save(path: &Path, map: &StatusMap) -> CacheResult<()> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(map)?;
    let tmp_path = temp_path(path);
    fs::write(&tmp_path, json).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)?;

    tracing::debug!("Saved {} cached statuses to {}", map.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Status cache bound to its file
#[derive(Debug, Clone)]
pub struct StatusCache {
    path: PathBuf,
    records: StatusMap,
}

impl StatusCache {
    /// Loads the cache stored at `path` (empty if the file is absent)
    pub fn load(path: impl Into<PathBuf>) -> CacheResult<Self> {
        let path = path.into();
        let records = load(&path)?;
        tracing::debug!(
            "Loaded {} cached statuses from {}",
            records.len(),
            path.display()
        );
        Ok(Self { path, records })
    }

    /// Writes every record back to the cache file
    pub fn save(&self) -> CacheResult<()> {
        save(&self.path, &self.records)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, url: &str) -> Option<&StatusRecord> {
        self.records.get(url)
    }

    /// Stores `record` for `url`, replacing any previous record
    pub fn insert(&mut self, url: impl Into<String>, record: StatusRecord) {
        self.records.insert(url.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
