//! Test generators.
//!
//! A test generator turns a lint report into source code for a JavaScript
//! assertion framework, so lint results show up in the host project's test
//! run. A file passes when its report has no error-level findings.

use std::sync::Arc;

use lintfilter_report::{DiagnosticMessage, FileReport};

use crate::FilterError;
use crate::options::TestGeneratorSpec;

/// Names of the built-in test generators.
pub const TEST_GENERATORS: &[&str] = &["qunit", "mocha"];

/// Renders lint reports as assertion-framework source.
pub trait TestGenerator: Send + Sync {
    /// Stable text identifying this generator's behavior, used in cache keys.
    fn fingerprint(&self) -> String;

    /// One self-contained test module for `relative_path`.
    fn generate(&self, relative_path: &str, messages: &[DiagnosticMessage], report: &FileReport) -> String;

    /// Whether `header`, `test_only` and `footer` are implemented.
    fn supports_grouping(&self) -> bool {
        false
    }

    /// Opening of a grouped module named `group`.
    fn header(&self, _group: &str) -> String {
        String::new()
    }

    /// A single test for `relative_path`, without the surrounding module.
    fn test_only(&self, relative_path: &str, messages: &[DiagnosticMessage], report: &FileReport) -> String {
        self.generate(relative_path, messages, report)
    }

    /// Closing of a grouped module.
    fn footer(&self) -> String {
        String::new()
    }
}

/// QUnit flavoured tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct QUnit;

impl TestGenerator for QUnit {
    fn fingerprint(&self) -> String {
        "qunit".to_string()
    }

    fn generate(&self, relative_path: &str, _messages: &[DiagnosticMessage], report: &FileReport) -> String {
        format!(
            "QUnit.module('ESLint | {path}');\n\
             QUnit.test('should pass ESLint', function(assert) {{\n\
             \x20 assert.expect(1);\n\
             \x20 assert.ok({passed}, '{message}');\n\
             }});\n",
            path = escape(relative_path),
            passed = report.passed(),
            message = escape(&assertion_message(relative_path, report)),
        )
    }

    fn supports_grouping(&self) -> bool {
        true
    }

    fn header(&self, group: &str) -> String {
        format!("QUnit.module('ESLint | {}');\n", escape(group))
    }

    fn test_only(&self, relative_path: &str, _messages: &[DiagnosticMessage], report: &FileReport) -> String {
        format!(
            "\nQUnit.test('{path}', function(assert) {{\n\
             \x20 assert.expect(1);\n\
             \x20 assert.ok({passed}, '{message}');\n\
             }});\n",
            path = escape(relative_path),
            passed = report.passed(),
            message = escape(&assertion_message(relative_path, report)),
        )
    }
}

/// Mocha tests using chai assertion errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mocha;

impl Mocha {
    fn body(indent: &str, passed: bool, passed_comment: &str, failed_comment: &str, message: &str) -> String {
        if passed {
            format!("{indent}// {passed_comment}\n")
        } else {
            format!(
                "{indent}// {failed_comment}\n\
                 {indent}var error = new chai.AssertionError('{message}');\n\
                 {indent}error.stack = undefined;\n\
                 {indent}throw error;\n",
                message = escape(message),
            )
        }
    }
}

impl TestGenerator for Mocha {
    fn fingerprint(&self) -> String {
        "mocha".to_string()
    }

    fn generate(&self, relative_path: &str, _messages: &[DiagnosticMessage], report: &FileReport) -> String {
        let body = Self::body(
            "    ",
            report.passed(),
            "ESLint passed",
            "ESLint failed",
            &assertion_message(relative_path, report),
        );
        format!(
            "describe('ESLint | {path}', function() {{\n\
             \x20 it('should pass ESLint', function() {{\n\
             {body}\
             \x20 }});\n\
             }});\n",
            path = escape(relative_path),
        )
    }

    fn supports_grouping(&self) -> bool {
        true
    }

    fn header(&self, group: &str) -> String {
        format!("describe('ESLint | {}', function() {{\n", escape(group))
    }

    fn test_only(&self, relative_path: &str, _messages: &[DiagnosticMessage], report: &FileReport) -> String {
        let body = Self::body(
            "    ",
            report.passed(),
            "test passed",
            "test failed",
            &assertion_message(relative_path, report),
        );
        format!(
            "\n  it('{path}', function() {{\n{body}  }});\n",
            path = escape(relative_path),
        )
    }

    fn footer(&self) -> String {
        "\n});\n".to_string()
    }
}

/// Looks up a built-in generator by name.
pub fn builtin(name: &str) -> Result<Arc<dyn TestGenerator>, FilterError> {
    match name {
        "qunit" => Ok(Arc::new(QUnit)),
        "mocha" => Ok(Arc::new(Mocha)),
        other => Err(FilterError::TestGeneratorNotFound(other.to_string())),
    }
}

/// Resolves a generator selection to an implementation.
pub fn resolve(spec: &TestGeneratorSpec) -> Result<Arc<dyn TestGenerator>, FilterError> {
    match spec {
        TestGeneratorSpec::Named(name) => builtin(name),
        TestGeneratorSpec::Custom(generator) => Ok(Arc::clone(generator)),
    }
}

/// `<path> should pass ESLint`, followed by a listing of the report's messages.
///
/// A report without messages gets the bare sentence, with no separator.
pub fn assertion_message(relative_path: &str, report: &FileReport) -> String {
    let mut message = format!("{relative_path} should pass ESLint");
    if !report.messages.is_empty() {
        message.push_str("\n\n");
        message.push_str(&render_messages(&report.messages));
    }
    message
}

/// `line:column - message (ruleId)`, one line per message.
pub fn render_messages(messages: &[DiagnosticMessage]) -> String {
    messages
        .iter()
        .map(|m| match &m.rule_id {
            Some(rule) => format!("{}:{} - {} ({rule})", m.line, m.column, m.message),
            None => format!("{}:{} - {}", m.line, m.column, m.message),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes `s` for a single- or double-quoted JavaScript string literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
