//! squawk violation → rdjson diagnostic translation.

use crate::rdjson::{Code, Diagnostic, Location, Source};
use crate::violation::RawViolation;

/// Base of squawk's per-rule documentation pages.
pub const RULE_DOCS_BASE_URL: &str = "https://squawkhq.com/docs/";

/// Diagnostic source advertised to reviewdog.
pub fn squawk_source() -> Source {
    Source {
        name: "squawk".to_string(),
        url: Some("https://github.com/sbdchd/squawk".to_string()),
    }
}

/// Translate one squawk violation into a diagnostic.
///
/// Message entries contribute their note, or their help when no note is
/// present, joined by single spaces in the order squawk reported them.
pub fn translate(violation: &RawViolation) -> Diagnostic {
    let message = violation
        .messages
        .iter()
        .filter_map(|m| m.text())
        .collect::<Vec<_>>()
        .join(" ");

    Diagnostic {
        message,
        location: Location {
            path: violation.file.clone(),
            line: violation.line,
            column: violation.column,
        },
        severity: violation.level.to_uppercase(),
        code: Code {
            value: violation.rule_name.clone(),
            url: Some(format!("{RULE_DOCS_BASE_URL}{}", violation.rule_name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationMessage;

    fn violation(messages: Vec<ViolationMessage>) -> RawViolation {
        RawViolation {
            file: "a.sql".to_string(),
            line: 10,
            column: Some(2),
            level: "warning".to_string(),
            rule_name: "ban-drop-column".to_string(),
            messages,
        }
    }

    #[test]
    fn test_translate_help_only() {
        let diagnostic = translate(&violation(vec![ViolationMessage::help("use expand/contract")]));

        assert_eq!(
            diagnostic,
            Diagnostic {
                message: "use expand/contract".to_string(),
                location: Location {
                    path: "a.sql".to_string(),
                    line: 10,
                    column: Some(2),
                },
                severity: "WARNING".to_string(),
                code: Code {
                    value: "ban-drop-column".to_string(),
                    url: Some("https://squawkhq.com/docs/ban-drop-column".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_message_join_order() {
        let diagnostic = translate(&violation(vec![
            ViolationMessage::note("Dropping a column may break clients."),
            ViolationMessage::default(),
            ViolationMessage::help("Stop reading the column first."),
        ]));
        assert_eq!(
            diagnostic.message,
            "Dropping a column may break clients. Stop reading the column first."
        );
    }

    #[test]
    fn test_note_wins_within_entry() {
        let diagnostic = translate(&violation(vec![ViolationMessage {
            note: Some("note".to_string()),
            help: Some("help".to_string()),
        }]));
        assert_eq!(diagnostic.message, "note");
    }

    #[test]
    fn test_severity_uppercased() {
        let mut raw = violation(Vec::new());
        raw.level = "Error".to_string();
        assert_eq!(translate(&raw).severity, "ERROR");

        raw.level = "notice".to_string();
        assert_eq!(translate(&raw).severity, "NOTICE");
    }

    #[test]
    fn test_column_absent() {
        let mut raw = violation(Vec::new());
        raw.column = None;
        let diagnostic = translate(&raw);
        assert_eq!(diagnostic.location.column, None);
        assert_eq!(diagnostic.message, "");
    }

    #[test]
    fn test_translate_is_idempotent() {
        let raw = violation(vec![ViolationMessage::note("n"), ViolationMessage::help("h")]);
        let first = serde_json::to_vec(&translate(&raw)).unwrap();
        let second = serde_json::to_vec(&translate(&raw)).unwrap();
        assert_eq!(first, second);
    }
}
