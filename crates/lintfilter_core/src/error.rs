//! Filter error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is malformed.
    #[error("Invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    /// Any other resolution failure.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// Creates an invalid-config error.
    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a generic configuration error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Error returned by a lint engine that could not produce a report.
///
/// Parse failures are not engine errors; they are reported as fatal
/// diagnostics inside the report.
#[derive(Debug, Error)]
#[error("Lint engine error: {0}")]
pub struct EngineError(pub String);

impl EngineError {
    /// Creates an engine error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while building a filter or running a build.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The input pipeline merges several trees before this filter.
    #[error(
        "LintFilter can only handle one:* nodes, but part of the given input pipeline is a many:* node \
         ('{node_type}' merges {inputs} trees; merging trees is an example of a many:* node). \
         Please perform many:* operations after linting."
    )]
    ManyToOne { node_type: String, inputs: usize },

    /// A transform node has no upstream input to resolve.
    #[error("Input node '{node_type}' has no upstream input")]
    MissingInput { node_type: String },

    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The lint engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A file has warnings and `throw_on_warn` is set.
    #[error("{path}: rules violation with `warn` severity level")]
    WarnThreshold { path: String },

    /// A file has errors and a failure threshold is set.
    #[error("{path}: rules violation with `error` severity level")]
    ErrorThreshold { path: String },

    /// Unknown built-in test generator.
    #[error("Could not find '{0}' test generator.")]
    TestGeneratorNotFound(String),

    /// Unknown built-in formatter.
    #[error("Could not find '{0}' formatter.")]
    FormatterNotFound(String),

    /// Grouped output was requested without a test generator.
    #[error("Grouped output '{0}' requires a test generator")]
    GroupRequiresGenerator(String),

    /// The configured test generator cannot render grouped output.
    #[error("Test generator '{0}' does not support grouped output")]
    GroupingUnsupported(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] lintfilter_cache::CacheError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
