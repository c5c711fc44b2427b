//! Cache entry types.

use lintfilter_report::FileReport;
use serde::{Deserialize, Serialize};

/// The value stored for one cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct CachedUnit {
    /// Report produced by the lint engine.
    pub report: FileReport,

    /// Emitted file content: the original source, or rendered test source.
    pub output: String,
}

impl CachedUnit {
    /// Creates a new cached unit.
    pub fn new(report: FileReport, output: impl Into<String>) -> Self {
        Self {
            report,
            output: output.into(),
        }
    }
}
