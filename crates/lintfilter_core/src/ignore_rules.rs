//! Ignore-file matching.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;

use crate::error::ConfigError;
use crate::options::EngineOptions;

/// Name of the default ignore file at the input root.
pub const IGNORE_FILE: &str = ".lintignore";

/// Patterns ignored even without an ignore file.
pub const DEFAULT_IGNORES: &[&str] = &["node_modules/", "bower_components/"];

/// Gitignore-style matcher for one input tree.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Builds the matcher for the tree at `root`.
    ///
    /// Reads `options.ignore_path` when set, otherwise `<root>/.lintignore` if
    /// present. An explicit ignore path that cannot be read is an error.
    pub fn new(root: impl Into<PathBuf>, options: &EngineOptions) -> Result<Self, ConfigError> {
        let root = root.into();
        let mut builder = GitignoreBuilder::new(&root);

        for pattern in DEFAULT_IGNORES {
            builder
                .add_line(None, pattern)
                .map_err(|e| ConfigError::other(e.to_string()))?;
        }

        let ignore_file = match &options.ignore_path {
            Some(path) if path.is_absolute() => Some(path.clone()),
            Some(path) => Some(root.join(path)),
            None => Some(root.join(IGNORE_FILE)).filter(|path| path.is_file()),
        };

        if let Some(file) = ignore_file {
            if !file.is_file() {
                return Err(ConfigError::Read {
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "ignore file not found"),
                    path: file,
                });
            }
            if let Some(err) = builder.add(&file) {
                return Err(ConfigError::invalid(&file, err.to_string()));
            }
            debug!("Loaded ignore patterns from {}", file.display());
        }

        let matcher = builder
            .build()
            .map_err(|e| ConfigError::other(e.to_string()))?;

        Ok(Self { root, matcher })
    }

    /// A matcher that ignores nothing.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            matcher: Gitignore::empty(),
        }
    }

    /// Whether `path` (absolute, under the root) is ignored.
    ///
    /// Paths outside the root are never ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if !path.starts_with(&self.root) {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }
}
