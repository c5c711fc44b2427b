//! Collaborator traits for the lint engine and configuration lookup.

use std::path::Path;

use lintfilter_report::FileReport;
use serde_json::Value;

use crate::error::{ConfigError, EngineError};

/// Runs lint rules over file content.
///
/// Implementations are shared across worker threads and must not keep
/// per-file mutable state.
pub trait LintEngine: Send + Sync {
    /// Lints `content` as if it were the file at `path`.
    ///
    /// Parse failures are reported as fatal messages in the report.
    fn lint_text(&self, content: &str, path: &Path) -> Result<FileReport, EngineError>;

    /// Whether ignore rules exclude `path`.
    fn is_path_ignored(&self, path: &Path) -> bool;
}

/// Resolves the effective rule configuration for a single file.
pub trait ConfigResolver: Send + Sync {
    fn resolve_for_path(&self, path: &Path) -> Result<Value, ConfigError>;
}
