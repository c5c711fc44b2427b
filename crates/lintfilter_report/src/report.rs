//! Per-file lint report.

use serde::{Deserialize, Serialize};

use crate::message::{DiagnosticMessage, Level};

/// The lint engine's output for one file.
///
/// Reports are treated as immutable values: filtering produces a new report
/// instead of editing the engine's output in place. Counts supplied by the
/// engine are authoritative and need not match `messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path the engine resolved configuration against.
    pub file_path: String,

    /// Findings in engine order.
    #[serde(default)]
    pub messages: Vec<DiagnosticMessage>,

    /// Number of error-level messages, fatal ones included.
    #[serde(default)]
    pub error_count: usize,

    /// Number of warning-level messages.
    #[serde(default)]
    pub warning_count: usize,
}

impl FileReport {
    /// Creates a report and derives its counts from `messages`.
    pub fn new(file_path: impl Into<String>, messages: Vec<DiagnosticMessage>) -> Self {
        let (error_count, warning_count) = count(&messages);
        Self {
            file_path: file_path.into(),
            messages,
            error_count,
            warning_count,
        }
    }

    /// Returns a copy of this report holding only the messages accepted by `keep`.
    ///
    /// The counts of dropped messages are subtracted from this report's
    /// counts, so totals the engine reported beyond its messages survive.
    pub fn retain_messages<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&DiagnosticMessage) -> bool,
    {
        let (kept, dropped): (Vec<DiagnosticMessage>, Vec<DiagnosticMessage>) =
            self.messages.iter().cloned().partition(|message| keep(message));
        let (dropped_errors, dropped_warnings) = count(&dropped);
        Self {
            file_path: self.file_path.clone(),
            messages: kept,
            error_count: self.error_count.saturating_sub(dropped_errors),
            warning_count: self.warning_count.saturating_sub(dropped_warnings),
        }
    }

    /// Whether the report carries no messages at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Pass state used by generated tests: no error-level findings.
    pub fn passed(&self) -> bool {
        self.error_count == 0
    }
}

fn count(messages: &[DiagnosticMessage]) -> (usize, usize) {
    messages
        .iter()
        .fold((0, 0), |(errors, warnings), message| {
            if message.fatal || message.severity == Level::Error {
                (errors + 1, warnings)
            } else if message.severity == Level::Warn {
                (errors, warnings + 1)
            } else {
                (errors, warnings)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileReport {
        FileReport::new(
            "/project/a.js",
            vec![
                DiagnosticMessage::new("no-console", "Unexpected console statement.", 1, 1, Level::Error),
                DiagnosticMessage::new("no-unused-vars", "'foo' is unused.", 2, 5, Level::Warn),
                DiagnosticMessage::fatal("Parsing error: Unexpected token", 9, 1),
            ],
        )
    }

    #[test]
    fn test_counts_derived_from_messages() {
        let report = sample();
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 1);
        assert!(!report.passed());
    }

    #[test]
    fn test_retain_messages_adjusts_counts_and_leaves_original() {
        let report = sample();
        let warnings_only = report.retain_messages(|m| m.severity == Level::Warn && !m.fatal);

        assert_eq!(warnings_only.messages.len(), 1);
        assert_eq!(warnings_only.error_count, 0);
        assert!(warnings_only.passed());
        assert_eq!(report.messages.len(), 3);
    }

    #[test]
    fn test_retain_messages_keeps_engine_counts() {
        let report = FileReport {
            file_path: "/project/a.js".to_string(),
            messages: vec![DiagnosticMessage::new("no-alert", "Unexpected alert.", 1, 1, Level::Warn)],
            error_count: 1,
            warning_count: 3,
        };

        let filtered = report.retain_messages(|m| m.rule_id.as_deref() != Some("no-alert"));
        assert!(filtered.is_empty());
        assert_eq!(filtered.error_count, 1);
        assert_eq!(filtered.warning_count, 2);
        assert!(!filtered.passed());

        let unchanged = report.retain_messages(|_| true);
        assert_eq!(unchanged, report);
    }

    #[test]
    fn test_deserialize_with_missing_counts() {
        let report: FileReport = serde_json::from_str(r#"{ "filePath": "x.js" }"#).unwrap();
        assert!(report.is_empty());
        assert!(report.passed());
    }
}
