//! The lint filter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lintfilter_cache::{CacheKey, CacheStore, CachedUnit, KeyInputs};
use lintfilter_report::{Severity, result_severity, strip_ignored_file_notices};
use serde_json::Value;
use tracing::{debug, warn};

use crate::FilterError;
use crate::engine::{ConfigResolver, LintEngine};
use crate::filter::{FilterCallbacks, PersistentFilter};
use crate::formatters::{self, Formatter};
use crate::input::InputNode;
use crate::options::FilterOptions;
use crate::test_generators::{self, TestGenerator};

/// Suffix replacing the source extension when tests are generated.
pub const TEST_SUFFIX: &str = "lint-test.js";

/// Lints every matching file of one input tree.
///
/// Passes sources through unchanged, or replaces them with generated tests
/// when a test generator is configured.
pub struct LintFilter {
    input_dir: PathBuf,
    options: FilterOptions,
    options_fingerprint: Value,
    engine: Arc<dyn LintEngine>,
    config: Arc<dyn ConfigResolver>,
    formatter: Arc<dyn Formatter>,
    test_generator: Option<Arc<dyn TestGenerator>>,
}

impl LintFilter {
    /// Resolves the input directory and the named formatter and generator.
    pub fn new(
        input: &InputNode,
        options: FilterOptions,
        engine: Arc<dyn LintEngine>,
        config: Arc<dyn ConfigResolver>,
    ) -> Result<Self, FilterError> {
        let input_dir = input.resolve_directory()?.to_path_buf();
        let formatter = formatters::resolve(&options.format)?;
        let test_generator = options
            .test_generator
            .as_ref()
            .map(test_generators::resolve)
            .transpose()?;

        if let Some(group) = &options.group {
            match &test_generator {
                None => return Err(FilterError::GroupRequiresGenerator(group.clone())),
                Some(generator) if !generator.supports_grouping() => {
                    return Err(FilterError::GroupingUnsupported(generator.fingerprint()));
                }
                Some(_) => {}
            }
        }

        let options_fingerprint = options.fingerprint();

        Ok(Self {
            input_dir,
            options,
            options_fingerprint,
            engine,
            config,
            formatter,
            test_generator,
        })
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn absolute(&self, relative_path: &str) -> PathBuf {
        self.input_dir.join(relative_path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.options.engine.ignore && self.engine.is_path_ignored(path)
    }

    /// Output path for `relative_path`, or `None` when the file is not linted.
    ///
    /// Files outside the configured extensions and files matched by ignore
    /// rules are passed through.
    pub fn destination_path_for(&self, relative_path: &str) -> Option<String> {
        let extension = self
            .options
            .engine
            .extensions
            .iter()
            .find(|ext| relative_path.ends_with(&format!(".{ext}")))?;

        if self.is_ignored(&self.absolute(relative_path)) {
            debug!("{} is ignored", relative_path);
            return None;
        }

        if self.test_generator.is_some() {
            let stem = &relative_path[..relative_path.len() - extension.len()];
            Some(format!("{stem}{TEST_SUFFIX}"))
        } else {
            Some(relative_path.to_string())
        }
    }

    /// Cache key for `content` at `relative_path`.
    ///
    /// Fails when the configuration for the path cannot be resolved.
    pub fn cache_key_for(&self, content: &str, relative_path: &str) -> Result<CacheKey, FilterError> {
        let path = self.absolute(relative_path);
        let config = self.config.resolve_for_path(&path)?;

        Ok(CacheKey::compute(&KeyInputs {
            content,
            relative_path,
            ignored: self.is_ignored(&path),
            options: &self.options_fingerprint,
            config: &config,
        }))
    }

    /// Lints one file and renders its output.
    pub fn process_file(&self, content: &str, relative_path: &str) -> Result<CachedUnit, FilterError> {
        let path = self.absolute(relative_path);
        let report = strip_ignored_file_notices(&self.engine.lint_text(content, &path)?);

        let output = match (&self.test_generator, &self.options.group) {
            (Some(generator), Some(_)) => generator.test_only(relative_path, &report.messages, &report),
            (Some(generator), None) => generator.generate(relative_path, &report.messages, &report),
            (None, _) => content.to_string(),
        };

        Ok(CachedUnit::new(report, output))
    }

    /// Reports `unit` and applies the failure thresholds.
    pub fn post_process_unit(&self, unit: &CachedUnit, relative_path: &str) -> Result<String, FilterError> {
        if unit.report.messages.is_empty() {
            return Ok(unit.output.clone());
        }

        self.options
            .sink
            .log(&self.formatter.format(std::slice::from_ref(&unit.report)));

        let severity = result_severity(&unit.report.messages);
        let throw_on_warn = self.options.throw_on_warn;
        let throw_on_error = self.options.throw_on_error;

        if throw_on_warn && severity == Severity::Warn {
            return Err(FilterError::WarnThreshold {
                path: relative_path.to_string(),
            });
        }
        if (throw_on_warn || throw_on_error) && severity >= Severity::Error {
            return Err(FilterError::ErrorThreshold {
                path: relative_path.to_string(),
            });
        }

        Ok(unit.output.clone())
    }
}

impl FilterCallbacks for LintFilter {
    fn destination_for(&self, relative_path: &str) -> Option<String> {
        self.destination_path_for(relative_path)
    }

    fn cache_key(&self, content: &str, relative_path: &str) -> Result<CacheKey, FilterError> {
        self.cache_key_for(content, relative_path)
    }

    fn process(&self, content: &str, relative_path: &str) -> Result<CachedUnit, FilterError> {
        self.process_file(content, relative_path)
    }

    fn post_process(&self, unit: &CachedUnit, relative_path: &str) -> Result<String, FilterError> {
        self.post_process_unit(unit, relative_path)
    }

    fn assemble(
        &self,
        processed: BTreeMap<String, String>,
        passed_through: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let (Some(group), Some(generator)) = (&self.options.group, &self.test_generator) else {
            let mut files = passed_through;
            files.extend(processed);
            return files;
        };

        let mut module = generator.header(group);
        for body in processed.values() {
            module.push_str(body);
        }
        module.push_str(&generator.footer());

        let mut files = passed_through;
        files.insert(format!("{group}.{TEST_SUFFIX}"), module);
        files
    }
}

/// Creates a ready-to-build lint filter for `input`.
///
/// With `persist` set, previously saved results are loaded from
/// `options.cache_dir`; an unreadable cache is discarded with a warning.
pub fn create_filter_node(
    input: &InputNode,
    options: FilterOptions,
    engine: Arc<dyn LintEngine>,
    config: Arc<dyn ConfigResolver>,
) -> Result<PersistentFilter<LintFilter>, FilterError> {
    let store = if options.persist {
        let mut store = CacheStore::new(&options.cache_dir);
        if let Err(e) = store.load() {
            warn!("Ignoring unreadable cache in {}: {}", options.cache_dir.display(), e);
            store.clear();
        }
        store
    } else {
        CacheStore::in_memory()
    };

    let filter = LintFilter::new(input, options, engine, config)?;
    Ok(PersistentFilter::new(filter, store))
}
