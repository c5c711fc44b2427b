//! Diagnostic message types.

use serde::{Deserialize, Serialize};

/// Rule level attached to a diagnostic.
///
/// Serialized as the numeric level used by lint engines (`0`, `1`, `2`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    /// Rule is disabled; the message is informational.
    #[default]
    Off,
    /// Rule violation that should be reviewed.
    Warn,
    /// Rule violation that must be fixed.
    Error,
}

impl Level {
    /// Numeric value of the level.
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Off => 0,
            Level::Warn => 1,
            Level::Error => 2,
        }
    }

    /// Parses a numeric level.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Level::Off),
            1 => Some(Level::Warn),
            2 => Some(Level::Error),
            _ => None,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        Level::from_u8(value).ok_or_else(|| format!("invalid severity level: {value}"))
    }
}

/// A single finding reported by the lint engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "rkyv",
    derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)
)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessage {
    /// 1-based line.
    pub line: u32,

    /// 1-based column.
    pub column: u32,

    /// The diagnostic text.
    pub message: String,

    /// The rule that produced this message. `None` for parse failures.
    #[serde(default)]
    pub rule_id: Option<String>,

    /// Severity level.
    #[serde(default)]
    pub severity: Level,

    /// Set when the message reports a parse failure rather than a rule violation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fatal: bool,
}

impl DiagnosticMessage {
    /// Creates a rule violation at `line:column`.
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        line: u32,
        column: u32,
        severity: Level,
    ) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            rule_id: Some(rule_id.into()),
            severity,
            fatal: false,
        }
    }

    /// Creates a fatal (parse failure) message, not tied to any rule.
    pub fn fatal(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            rule_id: None,
            severity: Level::Error,
            fatal: true,
        }
    }

    /// Rule id as displayed in reports; empty for fatal messages.
    pub fn rule_label(&self) -> &str {
        self.rule_id.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_numeric_serialization() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "1");
        let level: Level = serde_json::from_str("2").unwrap();
        assert_eq!(level, Level::Error);
    }

    #[test]
    fn test_level_rejects_out_of_range() {
        let result: Result<Level, _> = serde_json::from_str("3");
        assert!(result.is_err());
    }

    #[test]
    fn test_message_deserialize_engine_shape() {
        let json = r#"{
            "line": 1,
            "column": 5,
            "message": "'foo' is assigned a value but never used.",
            "ruleId": "no-unused-vars",
            "severity": 1
        }"#;

        let message: DiagnosticMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.rule_label(), "no-unused-vars");
        assert_eq!(message.severity, Level::Warn);
        assert!(!message.fatal);
    }

    #[test]
    fn test_fatal_message() {
        let message = DiagnosticMessage::fatal("Parsing error: Unexpected token", 3, 7);
        assert!(message.fatal);
        assert_eq!(message.severity, Level::Error);
        assert_eq!(message.rule_label(), "");
    }
}
