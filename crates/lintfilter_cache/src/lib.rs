//! # lintfilter_cache
//!
//! Content-addressed cache for per-file lint results.
//!
//! ## Cache Strategy
//!
//! 1. **Fingerprinted**: every entry is stored under a [`CacheKey`] computed from
//!    the file content, its relative path, its ignore status, the filter options
//!    and the rule configuration in effect for that exact path
//! 2. **Write-once**: a key is computed at most once and never overwritten
//! 3. **No expiry**: entries are only superseded by a change in one of the
//!    fingerprint inputs, never by age
//!
//! ## Storage
//!
//! Entries are persisted using `rkyv` for zero-copy deserialization,
//! providing fast cache reads without parsing overhead.

mod entry;
mod error;
mod key;
mod manager;

pub use entry::CachedUnit;
pub use error::CacheError;
pub use key::{CacheKey, KeyInputs, stable_serialize};
pub use manager::CacheStore;
