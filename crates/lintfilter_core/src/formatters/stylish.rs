//! Aligned table per file with a summary line.

use lintfilter_report::FileReport;

use super::{Formatter, pluralize, severity_label};

#[derive(Debug, Default, Clone, Copy)]
pub struct Stylish;

impl Formatter for Stylish {
    fn fingerprint(&self) -> String {
        "stylish".to_string()
    }

    fn format(&self, reports: &[FileReport]) -> String {
        let mut out = String::new();
        let mut errors = 0;
        let mut warnings = 0;

        for report in reports.iter().filter(|r| !r.messages.is_empty()) {
            errors += report.error_count;
            warnings += report.warning_count;

            let rows: Vec<[String; 4]> = report
                .messages
                .iter()
                .map(|m| {
                    [
                        format!("{}:{}", m.line, m.column),
                        severity_label(m).to_string(),
                        m.message.clone(),
                        m.rule_label().to_string(),
                    ]
                })
                .collect();

            let mut widths = [0usize; 3];
            for row in &rows {
                for (width, cell) in widths.iter_mut().zip(row.iter()) {
                    *width = (*width).max(cell.chars().count());
                }
            }

            out.push('\n');
            out.push_str(&report.file_path);
            out.push('\n');
            for [position, severity, message, rule] in &rows {
                let line = format!(
                    "  {position:<w0$}  {severity:<w1$}  {message:<w2$}  {rule}",
                    w0 = widths[0],
                    w1 = widths[1],
                    w2 = widths[2],
                );
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }

        let total = errors + warnings;
        if total > 0 {
            out.push_str(&format!(
                "\n\u{2716} {total} {} ({errors} {}, {warnings} {})\n",
                pluralize("problem", total),
                pluralize("error", errors),
                pluralize("warning", warnings),
            ));
        }
        out
    }
}
