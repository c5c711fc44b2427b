//! Engine and filter options.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::formatters::Formatter;
use crate::sink::{OutputSink, StderrSink};
use crate::test_generators::TestGenerator;

/// Options governing lint engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    /// File extensions to lint, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether ignore files are honored.
    #[serde(default = "default_ignore")]
    pub ignore: bool,

    /// Explicit ignore file, replacing `<root>/.lintignore`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_path: Option<PathBuf>,

    /// Explicit config file layered over discovered configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    /// Extra rule directories handed to the engine.
    #[serde(default)]
    pub rule_paths: Vec<PathBuf>,

    /// Inline rule overrides, applied last.
    #[serde(default)]
    pub rules: Map<String, Value>,

    /// Passthrough options for the engine.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string()]
}

fn default_ignore() -> bool {
    true
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore: default_ignore(),
            ignore_path: None,
            config_file: None,
            rule_paths: Vec::new(),
            rules: Map::new(),
            extra: Map::new(),
        }
    }
}

/// Formatter selection: a built-in name or a custom implementation.
#[derive(Clone)]
pub enum FormatterSpec {
    Named(String),
    Custom(Arc<dyn Formatter>),
}

impl FormatterSpec {
    /// Text standing in for this formatter in cache fingerprints.
    pub fn fingerprint(&self) -> String {
        match self {
            FormatterSpec::Named(name) => name.clone(),
            FormatterSpec::Custom(formatter) => formatter.fingerprint(),
        }
    }
}

impl Default for FormatterSpec {
    fn default() -> Self {
        FormatterSpec::Named("stylish".to_string())
    }
}

impl From<&str> for FormatterSpec {
    fn from(name: &str) -> Self {
        FormatterSpec::Named(name.to_string())
    }
}

impl fmt::Debug for FormatterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FormatterSpec::Custom(formatter) => {
                f.debug_tuple("Custom").field(&formatter.fingerprint()).finish()
            }
        }
    }
}

/// Test generator selection: a built-in name or a custom implementation.
#[derive(Clone)]
pub enum TestGeneratorSpec {
    Named(String),
    Custom(Arc<dyn TestGenerator>),
}

impl TestGeneratorSpec {
    /// Text standing in for this generator in cache fingerprints.
    pub fn fingerprint(&self) -> String {
        match self {
            TestGeneratorSpec::Named(name) => name.clone(),
            TestGeneratorSpec::Custom(generator) => generator.fingerprint(),
        }
    }
}

impl From<&str> for TestGeneratorSpec {
    fn from(name: &str) -> Self {
        TestGeneratorSpec::Named(name.to_string())
    }
}

impl fmt::Debug for TestGeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestGeneratorSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            TestGeneratorSpec::Custom(generator) => {
                f.debug_tuple("Custom").field(&generator.fingerprint()).finish()
            }
        }
    }
}

/// Options governing filter behavior.
#[derive(Clone)]
pub struct FilterOptions {
    /// Engine invocation options.
    pub engine: EngineOptions,
    /// Report formatter.
    pub format: FormatterSpec,
    /// Destination of formatted reports.
    pub sink: Arc<dyn OutputSink>,
    /// Whether the cache survives across filter instances.
    pub persist: bool,
    /// Directory of the persistent cache.
    pub cache_dir: PathBuf,
    /// Test generator; when set, outputs are generated tests.
    pub test_generator: Option<TestGeneratorSpec>,
    /// Group name for single-module test emission.
    pub group: Option<String>,
    /// Fail on warnings.
    pub throw_on_warn: bool,
    /// Fail on errors.
    pub throw_on_error: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            format: FormatterSpec::default(),
            sink: Arc::new(StderrSink),
            persist: true,
            cache_dir: PathBuf::from(".lintfilter-cache"),
            test_generator: None,
            group: None,
            throw_on_warn: false,
            throw_on_error: false,
        }
    }
}

impl FilterOptions {
    /// Creates options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_format(mut self, format: impl Into<FormatterSpec>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_test_generator(mut self, generator: impl Into<TestGeneratorSpec>) -> Self {
        self.test_generator = Some(generator.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_throw_on_warn(mut self, throw_on_warn: bool) -> Self {
        self.throw_on_warn = throw_on_warn;
        self
    }

    pub fn with_throw_on_error(mut self, throw_on_error: bool) -> Self {
        self.throw_on_error = throw_on_error;
        self
    }

    /// Deterministic JSON view of these options for cache keys.
    ///
    /// Custom formatters and generators appear as their fingerprints. The sink
    /// and cache location do not affect results and are left out.
    pub fn fingerprint(&self) -> Value {
        json!({
            "engine": self.engine,
            "format": self.format.fingerprint(),
            "persist": self.persist,
            "testGenerator": self.test_generator.as_ref().map(TestGeneratorSpec::fingerprint),
            "group": self.group,
            "throwOnWarn": self.throw_on_warn,
            "throwOnError": self.throw_on_error,
        })
    }
}

impl fmt::Debug for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOptions")
            .field("engine", &self.engine)
            .field("format", &self.format)
            .field("persist", &self.persist)
            .field("cache_dir", &self.cache_dir)
            .field("test_generator", &self.test_generator)
            .field("group", &self.group)
            .field("throw_on_warn", &self.throw_on_warn)
            .field("throw_on_error", &self.throw_on_error)
            .finish_non_exhaustive()
    }
}
