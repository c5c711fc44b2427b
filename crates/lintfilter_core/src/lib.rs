//! # lintfilter_core
//!
//! Incremental lint filter for build pipelines.
//!
//! This crate provides:
//! - [`LintFilter`], which lints the files of one input tree, reports
//!   findings and optionally turns them into generated tests
//! - [`PersistentFilter`], the per-file tree filter driving each build
//!   against a content-addressed cache
//! - Reference collaborators: [`LintrcResolver`] for hierarchical rule
//!   configuration and [`IgnoreRules`] for ignore files
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintfilter_core::{FilterOptions, InputNode, Snapshot, create_filter_node};
//!
//! let input = InputNode::source("app");
//! let options = FilterOptions::new().with_test_generator("qunit");
//! let filter = create_filter_node(&input, options, engine, resolver)?;
//!
//! let output = filter.build(&Snapshot::from_dir("app".as_ref())?)?;
//! output.write_to("dist".as_ref())?;
//! ```

pub mod config;
pub mod engine;
mod error;
pub mod filter;
pub mod formatters;
pub mod ignore_rules;
mod input;
mod lint_filter;
pub mod options;
pub mod sink;
mod snapshot;
pub mod test_generators;

pub use config::{LINTRC_FILE, LintrcResolver, rule_level};
pub use engine::{ConfigResolver, LintEngine};
pub use error::{ConfigError, EngineError, FilterError};
pub use filter::{BuildOutput, BuildStats, FilterCallbacks, PersistentFilter};
pub use formatters::{FORMATTERS, Formatter};
pub use ignore_rules::IgnoreRules;
pub use input::{InputNode, resolve_directory};
pub use lint_filter::{LintFilter, TEST_SUFFIX, create_filter_node};
pub use options::{EngineOptions, FilterOptions, FormatterSpec, TestGeneratorSpec};
pub use sink::{BufferSink, OutputSink, StderrSink, StdoutSink, TracingSink};
pub use snapshot::Snapshot;
pub use test_generators::{TEST_GENERATORS, TestGenerator};

pub use lintfilter_cache::{CacheKey, CacheStore, CachedUnit};
pub use lintfilter_report::{DiagnosticMessage, FileReport, Level, Severity, result_severity};
