//! Cache store for per-file results.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rkyv::util::AlignedVec;
use tracing::{debug, info};

use crate::{CacheError, CacheKey, CachedUnit};

const CACHE_FILE: &str = "cache.rkyv";

/// Content-addressed store of [`CachedUnit`]s.
///
/// Entries always live in memory for the lifetime of the store. When the
/// store is persistent, [`load`](Self::load) and [`save`](Self::save) also
/// mirror them to `<cache_dir>/cache.rkyv` so they survive across processes.
pub struct CacheStore {
    /// Directory where the cache file is stored.
    cache_dir: PathBuf,
    /// In-memory entries, keyed by digest.
    entries: HashMap<String, CachedUnit>,
    /// Whether entries are mirrored to disk.
    persistent: bool,
}

impl CacheStore {
    /// Creates a persistent store rooted at `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            entries: HashMap::new(),
            persistent: true,
        }
    }

    /// Creates a store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            cache_dir: PathBuf::new(),
            entries: HashMap::new(),
            persistent: false,
        }
    }

    /// Returns whether entries are mirrored to disk.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Directory holding the cache file.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the cache file.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Gets the unit stored under `key`.
    pub fn get(&self, key: &CacheKey) -> Option<&CachedUnit> {
        self.entries.get(key.as_str())
    }

    /// Returns true if `key` has a stored unit.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key.as_str())
    }

    /// Stores `unit` under `key` unless the key is already present.
    ///
    /// Returns `true` if the unit was stored. Keys are write-once: an existing
    /// unit for the same fingerprint is kept.
    pub fn insert(&mut self, key: CacheKey, unit: CachedUnit) -> bool {
        if self.entries.contains_key(key.as_str()) {
            return false;
        }
        self.entries.insert(key.as_str().to_owned(), unit);
        true
    }

    /// Removes the entry stored under `key`.
    pub fn remove(&mut self, key: &CacheKey) -> Option<CachedUnit> {
        self.entries.remove(key.as_str())
    }

    /// Drops every entry whose key is not in `live`.
    ///
    /// Returns the number of entries removed.
    pub fn retain_keys(&mut self, live: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| live.contains(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Evicted {} stale cache entries", removed);
        }
        removed
    }

    /// Clears all cache entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Loads entries from disk, merging them into memory.
    pub fn load(&mut self) -> Result<(), CacheError> {
        if !self.persistent {
            return Ok(());
        }

        let cache_file = self.cache_file();

        if !cache_file.exists() {
            debug!("No cache file found at {}", cache_file.display());
            return Ok(());
        }

        let content = fs::read(&cache_file)?;
        let mut aligned = AlignedVec::<16>::new();
        aligned.extend_from_slice(&content);

        let entries: HashMap<String, CachedUnit> =
            rkyv::from_bytes::<_, rkyv::rancor::Error>(&aligned)
                .map_err(|e| CacheError::corrupted(e.to_string()))?;

        info!("Loaded {} cache entries", entries.len());
        for (key, unit) in entries {
            self.entries.entry(key).or_insert(unit);
        }

        Ok(())
    }

    /// Saves entries to disk.
    ///
    /// The file is written to a uniquely named sibling and renamed into place,
    /// so readers never observe a partial cache file and concurrent writers
    /// never share a staging file.
    pub fn save(&self) -> Result<(), CacheError> {
        if !self.persistent {
            return Ok(());
        }

        fs::create_dir_all(&self.cache_dir)?;

        let cache_file = self.cache_file();
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&self.entries)
            .map_err(|e| CacheError::serialization(e.to_string()))?;

        let mut staging = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        staging.write_all(&bytes)?;
        staging.persist(&cache_file).map_err(|e| e.error)?;

        info!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            cache_file.display()
        );

        Ok(())
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(".lintfilter-cache")
    }
}
