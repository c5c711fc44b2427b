//! Directory snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::FilterError;

/// The contents of an input tree: relative path to file content.
///
/// Paths are `/`-separated and relative to the tree root. Iteration order is
/// path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every regular file under `root`.
    ///
    /// Files that are not valid UTF-8 are skipped with a warning.
    pub fn from_dir(root: &Path) -> Result<Self, FilterError> {
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| FilterError::Io(std::io::Error::other(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let bytes = fs::read(entry.path())?;
            match String::from_utf8(bytes) {
                Ok(content) => {
                    files.insert(relative, content);
                }
                Err(_) => warn!("Skipping non UTF-8 file {}", entry.path().display()),
            }
        }

        Ok(Self { files })
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, relative_path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(relative_path.into(), content.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(relative_path, content);
        self
    }

    pub fn remove(&mut self, relative_path: &str) -> Option<String> {
        self.files.remove(relative_path)
    }

    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.files.get(relative_path).map(String::as_str)
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_dir_uses_forward_slashes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/nested")).unwrap();
        fs::write(dir.path().join("a.js"), "var a;").unwrap();
        fs::write(dir.path().join("lib/nested/b.js"), "var b;").unwrap();

        let snapshot = Snapshot::from_dir(dir.path()).unwrap();
        let paths: Vec<&str> = snapshot.files().keys().map(String::as_str).collect();

        assert_eq!(paths, vec!["a.js", "lib/nested/b.js"]);
        assert_eq!(snapshot.get("lib/nested/b.js"), Some("var b;"));
    }

    #[test]
    fn test_from_dir_skips_binary() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "var a;").unwrap();
        fs::write(dir.path().join("logo.png"), [0xff, 0xfe, 0x00]).unwrap();

        let snapshot = Snapshot::from_dir(dir.path()).unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_builder() {
        let mut snapshot = Snapshot::new().with_file("a.js", "1").with_file("b.js", "2");
        assert_eq!(snapshot.remove("a.js").as_deref(), Some("1"));
        assert_eq!(snapshot.len(), 1);
    }
}
