//! Persistent per-file tree filter.
//!
//! [`PersistentFilter`] drives one build over a [`Snapshot`]: every file is
//! gated, fingerprinted, looked up in the cache, processed on a miss, and
//! post-processed whether or not the result came from the cache. What each of
//! those steps means is supplied by a [`FilterCallbacks`] implementation.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use lintfilter_cache::{CacheKey, CacheStore, CachedUnit};
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::FilterError;
use crate::snapshot::Snapshot;

/// Per-file behavior plugged into a [`PersistentFilter`].
pub trait FilterCallbacks: Send + Sync {
    /// Output path for `relative_path`, or `None` to pass the file through
    /// untouched.
    fn destination_for(&self, relative_path: &str) -> Option<String>;

    /// Fingerprint deciding whether a cached unit can be reused.
    fn cache_key(&self, content: &str, relative_path: &str) -> Result<CacheKey, FilterError>;

    /// Expensive per-file work whose result is cached.
    fn process(&self, content: &str, relative_path: &str) -> Result<CachedUnit, FilterError>;

    /// Side effects run for every gated-in file, cached or not. Returns the
    /// content to emit.
    fn post_process(&self, unit: &CachedUnit, relative_path: &str) -> Result<String, FilterError>;

    /// Combines processed outputs (keyed by destination) with passed-through
    /// files into the output tree.
    fn assemble(
        &self,
        processed: BTreeMap<String, String>,
        passed_through: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut files = passed_through;
        files.extend(processed);
        files
    }
}

/// Counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Files processed because of a cache miss.
    pub processed: usize,
    /// Files served from the cache.
    pub cache_hits: usize,
    /// Files post-processed (hits and misses).
    pub post_processed: usize,
    /// Files emitted unchanged.
    pub passed_through: usize,
}

/// Output tree of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub files: BTreeMap<String, String>,
    pub stats: BuildStats,
}

impl BuildOutput {
    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.files.get(relative_path).map(String::as_str)
    }

    /// Writes the output tree under `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<(), FilterError> {
        for (relative, content) in &self.files {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }
        Ok(())
    }
}

enum Selected {
    PassThrough,
    Unit {
        destination: String,
        unit: CachedUnit,
        hit: bool,
    },
}

/// Tree filter with a content-addressed cache of per-file results.
pub struct PersistentFilter<C> {
    callbacks: C,
    store: Mutex<CacheStore>,
}

impl<C: FilterCallbacks> PersistentFilter<C> {
    pub fn new(callbacks: C, store: CacheStore) -> Self {
        Self {
            callbacks,
            store: Mutex::new(store),
        }
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    /// Number of units currently cached.
    pub fn cache_len(&self) -> usize {
        self.store.lock().len()
    }

    /// Runs one build over `snapshot`.
    ///
    /// Files are gated and processed in parallel, then post-processed in path
    /// order; the first failure in path order fails the build. In either case
    /// the cache is pruned to the keys of this snapshot and saved.
    pub fn build(&self, snapshot: &Snapshot) -> Result<BuildOutput, FilterError> {
        let live = Mutex::new(HashSet::new());
        let result = self.run(snapshot, &live);

        let mut store = self.store.lock();
        store.retain_keys(&live.into_inner());
        if let Err(e) = store.save() {
            warn!("Failed to save cache: {}", e);
        }

        result
    }

    fn run(&self, snapshot: &Snapshot, live: &Mutex<HashSet<String>>) -> Result<BuildOutput, FilterError> {
        let files: Vec<(&String, &String)> = snapshot.files().iter().collect();

        let selected: Vec<Result<Selected, FilterError>> = files
            .par_iter()
            .map(|(relative, content)| self.select(content, relative, live))
            .collect();

        let mut stats = BuildStats::default();
        let mut processed = BTreeMap::new();
        let mut passed_through = BTreeMap::new();

        for ((relative, content), selected) in files.into_iter().zip(selected) {
            match selected? {
                Selected::PassThrough => {
                    stats.passed_through += 1;
                    passed_through.insert(relative.clone(), content.clone());
                }
                Selected::Unit {
                    destination,
                    unit,
                    hit,
                } => {
                    if hit {
                        stats.cache_hits += 1;
                    } else {
                        stats.processed += 1;
                    }
                    let output = self.callbacks.post_process(&unit, relative)?;
                    stats.post_processed += 1;
                    processed.insert(destination, output);
                }
            }
        }

        info!(
            "Build finished: {} processed, {} from cache, {} passed through",
            stats.processed, stats.cache_hits, stats.passed_through
        );

        Ok(BuildOutput {
            files: self.callbacks.assemble(processed, passed_through),
            stats,
        })
    }

    fn select(
        &self,
        content: &str,
        relative: &str,
        live: &Mutex<HashSet<String>>,
    ) -> Result<Selected, FilterError> {
        let Some(destination) = self.callbacks.destination_for(relative) else {
            debug!("Passing through {}", relative);
            return Ok(Selected::PassThrough);
        };

        let key = self.callbacks.cache_key(content, relative)?;
        live.lock().insert(key.as_str().to_owned());

        let cached = self.store.lock().get(&key).cloned();
        if let Some(unit) = cached {
            debug!("Cache hit for {}", relative);
            return Ok(Selected::Unit {
                destination,
                unit,
                hit: true,
            });
        }

        debug!("Cache miss for {}", relative);
        let unit = self.callbacks.process(content, relative)?;
        self.store.lock().insert(key, unit.clone());

        Ok(Selected::Unit {
            destination,
            unit,
            hit: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintfilter_cache::KeyInputs;
    use lintfilter_report::FileReport;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Upper-cases `.txt` files and passes everything else through.
    #[derive(Default)]
    struct Upper {
        processed: AtomicUsize,
        post_processed: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl FilterCallbacks for Upper {
        fn destination_for(&self, relative_path: &str) -> Option<String> {
            relative_path.ends_with(".txt").then(|| relative_path.to_string())
        }

        fn cache_key(&self, content: &str, relative_path: &str) -> Result<CacheKey, FilterError> {
            let empty = json!({});
            Ok(CacheKey::compute(&KeyInputs {
                content,
                relative_path,
                ignored: false,
                options: &empty,
                config: &empty,
            }))
        }

        fn process(&self, content: &str, relative_path: &str) -> Result<CachedUnit, FilterError> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            Ok(CachedUnit::new(
                FileReport::new(relative_path, vec![]),
                content.to_uppercase(),
            ))
        }

        fn post_process(&self, unit: &CachedUnit, relative_path: &str) -> Result<String, FilterError> {
            self.post_processed.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(relative_path) {
                return Err(FilterError::ErrorThreshold {
                    path: relative_path.to_string(),
                });
            }
            Ok(unit.output.clone())
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new()
            .with_file("a.txt", "alpha")
            .with_file("b.txt", "beta")
            .with_file("c.bin", "raw")
    }

    #[test]
    fn test_build_processes_and_passes_through() {
        let filter = PersistentFilter::new(Upper::default(), CacheStore::in_memory());
        let output = filter.build(&snapshot()).unwrap();

        assert_eq!(output.get("a.txt"), Some("ALPHA"));
        assert_eq!(output.get("c.bin"), Some("raw"));
        assert_eq!(
            output.stats,
            BuildStats {
                processed: 2,
                cache_hits: 0,
                post_processed: 2,
                passed_through: 1,
            }
        );
    }

    #[test]
    fn test_second_build_hits_cache() {
        let filter = PersistentFilter::new(Upper::default(), CacheStore::in_memory());
        filter.build(&snapshot()).unwrap();
        let output = filter.build(&snapshot()).unwrap();

        assert_eq!(output.stats.processed, 0);
        assert_eq!(output.stats.cache_hits, 2);
        assert_eq!(output.stats.post_processed, 2);
        assert_eq!(filter.callbacks().processed.load(Ordering::SeqCst), 2);
        assert_eq!(filter.callbacks().post_processed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_changed_file_is_reprocessed() {
        let filter = PersistentFilter::new(Upper::default(), CacheStore::in_memory());
        filter.build(&snapshot()).unwrap();

        let changed = snapshot().with_file("b.txt", "gamma");
        let output = filter.build(&changed).unwrap();

        assert_eq!(output.stats.processed, 1);
        assert_eq!(output.stats.cache_hits, 1);
        assert_eq!(output.get("b.txt"), Some("GAMMA"));
    }

    #[test]
    fn test_first_failure_fails_build_and_cache_is_saved() {
        let dir = tempdir().unwrap();
        let callbacks = Upper {
            fail_on: Some("a.txt"),
            ..Upper::default()
        };
        let filter = PersistentFilter::new(callbacks, CacheStore::new(dir.path()));

        let err = filter.build(&snapshot()).unwrap_err();
        assert!(matches!(err, FilterError::ErrorThreshold { ref path } if path == "a.txt"));
        assert!(dir.path().join("cache.rkyv").exists());
        assert_eq!(filter.cache_len(), 2);
    }

    #[test]
    fn test_edited_file_does_not_grow_cache() {
        let dir = tempdir().unwrap();
        let filter = PersistentFilter::new(Upper::default(), CacheStore::new(dir.path()));

        for i in 0..20 {
            let edited = snapshot().with_file("b.txt", &format!("beta {i}"));
            filter.build(&edited).unwrap();
        }
        assert_eq!(filter.cache_len(), 2);

        let mut reloaded = CacheStore::new(dir.path());
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_removed_file_is_evicted() {
        let filter = PersistentFilter::new(Upper::default(), CacheStore::in_memory());
        filter.build(&snapshot()).unwrap();

        let shrunk = Snapshot::new().with_file("a.txt", "alpha");
        let output = filter.build(&shrunk).unwrap();

        assert_eq!(output.stats.cache_hits, 1);
        assert_eq!(filter.cache_len(), 1);
    }

    #[test]
    fn test_write_to() {
        let dir = tempdir().unwrap();
        let output = BuildOutput {
            files: BTreeMap::from([("lib/a.js".to_string(), "var a;".to_string())]),
            stats: BuildStats::default(),
        };
        output.write_to(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("lib/a.js")).unwrap(), "var a;");
    }
}
