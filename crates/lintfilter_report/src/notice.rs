//! Removal of "file ignored" notices.
//!
//! Engines that are asked to lint an ignored file answer with a warning
//! announcing the skip instead of real findings. The filter already knows the
//! ignore status of each path, so these notices are dropped from reports.

use crate::message::DiagnosticMessage;
use crate::report::FileReport;

const IGNORED_FILE_NOTICES: [&str; 2] = [
    "File ignored by default.",
    "File ignored because of a matching ignore pattern.",
];

/// Whether `message` only announces that the file was skipped.
pub fn is_ignored_file_notice(message: &DiagnosticMessage) -> bool {
    IGNORED_FILE_NOTICES
        .iter()
        .any(|notice| message.message.contains(notice))
}

/// Returns a new report without ignored-file notices.
pub fn strip_ignored_file_notices(report: &FileReport) -> FileReport {
    report.retain_messages(|message| !is_ignored_file_notice(message))
}
