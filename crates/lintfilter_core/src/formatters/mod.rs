//! Report formatters.

mod compact;
mod stylish;

use std::sync::Arc;

use lintfilter_report::{DiagnosticMessage, FileReport};

use crate::FilterError;
use crate::options::FormatterSpec;

pub use compact::Compact;
pub use stylish::Stylish;

/// Names of the built-in formatters.
pub const FORMATTERS: &[&str] = &["stylish", "compact"];

/// Renders reports as human-readable text.
pub trait Formatter: Send + Sync {
    /// Stable text identifying this formatter's behavior, used in cache keys.
    fn fingerprint(&self) -> String;

    fn format(&self, reports: &[FileReport]) -> String;
}

/// Resolves a formatter selection to an implementation.
pub fn resolve(spec: &FormatterSpec) -> Result<Arc<dyn Formatter>, FilterError> {
    match spec {
        FormatterSpec::Custom(formatter) => Ok(Arc::clone(formatter)),
        FormatterSpec::Named(name) => match name.as_str() {
            "stylish" => Ok(Arc::new(Stylish)),
            "compact" => Ok(Arc::new(Compact)),
            other => Err(FilterError::FormatterNotFound(other.to_string())),
        },
    }
}

fn severity_label(message: &DiagnosticMessage) -> &'static str {
    if message.fatal || message.severity == lintfilter_report::Level::Error {
        "error"
    } else {
        "warning"
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin() {
        for name in FORMATTERS {
            let formatter = resolve(&FormatterSpec::from(*name)).unwrap();
            assert_eq!(formatter.fingerprint(), *name);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve(&FormatterSpec::from("checkstyle")).err().unwrap();
        assert!(matches!(err, FilterError::FormatterNotFound(ref name) if name == "checkstyle"));
    }
}
