//! One line per message.

use lintfilter_report::FileReport;

use super::{Formatter, pluralize, severity_label};

/// `<path>: line L, col C, Error - message (rule)` per message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Compact;

impl Formatter for Compact {
    fn fingerprint(&self) -> String {
        "compact".to_string()
    }

    fn format(&self, reports: &[FileReport]) -> String {
        let mut out = String::new();
        let mut total = 0;

        for report in reports {
            for message in &report.messages {
                total += 1;
                let label = match severity_label(message) {
                    "error" => "Error",
                    _ => "Warning",
                };
                out.push_str(&format!(
                    "{}: line {}, col {}, {} - {}",
                    report.file_path, message.line, message.column, label, message.message
                ));
                if let Some(rule) = &message.rule_id {
                    out.push_str(&format!(" ({rule})"));
                }
                out.push('\n');
            }
        }

        if total > 0 {
            out.push_str(&format!("\n{total} {}", pluralize("problem", total)));
        }
        out
    }
}
