//! Severity evaluation of a set of diagnostics.

use serde::{Deserialize, Serialize};

use crate::message::{DiagnosticMessage, Level};

/// Ordinal classification of a set of messages.
///
/// Ordered, so `severity >= Severity::Error` reads as "an error is present".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No warnings or errors.
    #[default]
    Clean,
    /// At least one warning and no errors.
    Warn,
    /// At least one error or fatal message.
    Error,
}

impl Severity {
    /// Ordinal value: 0 clean, 1 warning, 2 error.
    pub fn as_u8(self) -> u8 {
        match self {
            Severity::Clean => 0,
            Severity::Warn => 1,
            Severity::Error => 2,
        }
    }
}

/// Weight of a single message: fatal and error-level messages weigh 2,
/// anything else weighs its own level.
fn weight(message: &DiagnosticMessage) -> u8 {
    if message.fatal || message.severity == Level::Error {
        Level::Error.as_u8()
    } else {
        message.severity.as_u8()
    }
}

/// Reduces `messages` to a single [`Severity`] band.
///
/// Empty input is [`Severity::Clean`]. The band is decided by the heaviest
/// message, so any number of warnings stays in [`Severity::Warn`].
pub fn result_severity(messages: &[DiagnosticMessage]) -> Severity {
    match messages.iter().map(weight).max().unwrap_or(0) {
        0 => Severity::Clean,
        1 => Severity::Warn,
        _ => Severity::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_level(level: Level) -> DiagnosticMessage {
        DiagnosticMessage::new("rule", "message", 1, 1, level)
    }

    fn levels(levels: &[u8]) -> Vec<DiagnosticMessage> {
        levels
            .iter()
            .filter_map(|&l| Level::from_u8(l))
            .map(with_level)
            .collect()
    }

    #[rstest]
    #[case::errors_present(&[0, 2, 1, 0, 0, 2], Severity::Error)]
    #[case::only_warnings(&[0, 1, 1, 0, 0, 1], Severity::Warn)]
    #[case::all_off(&[0, 0, 0, 0, 0, 0], Severity::Clean)]
    #[case::empty(&[], Severity::Clean)]
    #[case::single_error(&[2], Severity::Error)]
    #[case::single_warning(&[1], Severity::Warn)]
    fn test_result_severity(#[case] input: &[u8], #[case] expected: Severity) {
        assert_eq!(result_severity(&levels(input)), expected);
    }

    #[test]
    fn test_fatal_counts_as_error() {
        let mut message = with_level(Level::Off);
        message.fatal = true;
        assert!(result_severity(&[message]) >= Severity::Error);
    }

    #[test]
    fn test_ordinal_values() {
        assert_eq!(Severity::Clean.as_u8(), 0);
        assert_eq!(Severity::Warn.as_u8(), 1);
        assert_eq!(Severity::Error.as_u8(), 2);
    }
}
