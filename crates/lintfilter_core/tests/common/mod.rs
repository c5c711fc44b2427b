//! Shared helpers for lint filter integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lintfilter_core::{
    ConfigResolver, DiagnosticMessage, EngineError, EngineOptions, FileReport, FilterOptions,
    IgnoreRules, InputNode, Level, LintEngine, LintFilter, LintrcResolver, PersistentFilter,
    Snapshot, create_filter_node, rule_level,
};
use serde_json::Value;
use tempfile::TempDir;

/// Engine recognising a handful of textual patterns.
///
/// - `console.` reports `no-console`
/// - `alert(` reports `no-alert`
/// - `var foo` reports `no-unused-vars`
/// - `<<<` is a parse failure
///
/// Rule levels come from the `.lintrc.json` hierarchy. Ignored files get the
/// usual "File ignored" notice instead of findings.
pub struct PatternEngine {
    resolver: LintrcResolver,
    ignore: IgnoreRules,
    calls: AtomicUsize,
}

impl PatternEngine {
    pub fn new(root: &Path, options: &EngineOptions) -> Self {
        Self {
            resolver: LintrcResolver::new(root, options),
            ignore: IgnoreRules::new(root, options).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of files linted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LintEngine for PatternEngine {
    fn lint_text(&self, content: &str, path: &Path) -> Result<FileReport, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let file_path = path.to_string_lossy().to_string();

        if self.ignore.is_ignored(path) {
            let notice = DiagnosticMessage::new(
                "",
                "File ignored because of a matching ignore pattern. Use \"--no-ignore\" to override.",
                0,
                0,
                Level::Warn,
            );
            return Ok(FileReport::new(file_path, vec![notice]));
        }

        let config = self
            .resolver
            .resolve_for_path(path)
            .map_err(|e| EngineError::new(e.to_string()))?;

        let mut messages = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index as u32 + 1;

            if let Some(col) = line.find("<<<") {
                messages.push(DiagnosticMessage::fatal(
                    "Parsing error: Unexpected token <<",
                    line_number,
                    col as u32 + 1,
                ));
                break;
            }

            let checks = [
                ("console.", "no-console", "Unexpected console statement.", 0),
                ("alert(", "no-alert", "Unexpected alert.", 0),
                (
                    "var foo",
                    "no-unused-vars",
                    "'foo' is assigned a value but never used.",
                    4,
                ),
            ];
            for (pattern, rule, text, offset) in checks {
                let Some(col) = line.find(pattern) else {
                    continue;
                };
                let level = rule_level(&config, rule);
                if level != Level::Off {
                    messages.push(DiagnosticMessage::new(
                        rule,
                        text,
                        line_number,
                        (col + offset) as u32 + 1,
                        level,
                    ));
                }
            }
        }

        Ok(FileReport::new(file_path, messages))
    }

    fn is_path_ignored(&self, path: &Path) -> bool {
        self.ignore.is_ignored(path)
    }
}

/// A temporary project: an input tree under `app/` and a cache directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.input()).unwrap();
        for (path, content) in files {
            fixture.write(path, content);
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn input(&self) -> PathBuf {
        self.dir.path().join("app")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.input().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.input().join(relative)).unwrap();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_dir(&self.input()).unwrap()
    }

    /// Default options pointing the cache at this fixture.
    pub fn options(&self) -> FilterOptions {
        FilterOptions::new().with_cache_dir(self.cache_dir())
    }

    pub fn engine(&self, options: &FilterOptions) -> Arc<PatternEngine> {
        Arc::new(PatternEngine::new(&self.input(), &options.engine))
    }

    pub fn resolver(&self, options: &FilterOptions) -> Arc<LintrcResolver> {
        Arc::new(LintrcResolver::new(self.input(), &options.engine))
    }

    /// Creates a filter and returns it with its engine.
    pub fn filter(&self, options: FilterOptions) -> (PersistentFilter<LintFilter>, Arc<PatternEngine>) {
        let engine = self.engine(&options);
        let resolver = self.resolver(&options);
        let filter = create_filter_node(&InputNode::source(self.input()), options, engine.clone(), resolver)
            .unwrap();
        (filter, engine)
    }
}

/// `.lintrc.json` content enabling the given rules.
pub fn lintrc(rules: Value) -> String {
    serde_json::json!({ "rules": rules }).to_string()
}
