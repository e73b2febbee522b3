//! Reviewdog Diagnostic Format (rdjson) documents.
//!
//! Locations are kept flat in memory (`path`, `line`, `column`) and written
//! in rdjson's nested `range.start` shape on the wire.

use serde::{Deserialize, Serialize};

/// Name of the tool that produced a diagnostic set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Position of a diagnostic in a file. Lines and columns are 1-based as
/// reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireLocation", from = "WireLocation")]
pub struct Location {
    pub path: String,
    pub line: u32,
    pub column: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One finding, ready for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub location: Location,
    pub severity: String,
    pub code: Code,
}

/// The complete document handed to reviewdog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSet {
    pub source: Source,
    pub severity: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSet {
    pub fn new(source: Source, severity: impl Into<String>) -> Self {
        Self {
            source,
            severity: severity.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Extend<Diagnostic> for DiagnosticSet {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

// rdjson wire shape: {"path": .., "range": {"start": {"line": .., "column": ..}}}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireLocation {
    path: String,
    range: WireRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireRange {
    start: WirePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WirePosition {
    line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<u32>,
}

impl From<Location> for WireLocation {
    fn from(location: Location) -> Self {
        Self {
            path: location.path,
            range: WireRange {
                start: WirePosition {
                    line: location.line,
                    column: location.column,
                },
            },
        }
    }
}

impl From<WireLocation> for Location {
    fn from(wire: WireLocation) -> Self {
        Self {
            path: wire.path,
            line: wire.range.start.line,
            column: wire.range.start.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Diagnostic {
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
    }

    #[test]
    fn test_diagnostic_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "message": "use expand/contract",
                "location": {
                    "path": "a.sql",
                    "range": {"start": {"line": 10, "column": 2}}
                },
                "severity": "WARNING",
                "code": {
                    "value": "ban-drop-column",
                    "url": "https://squawkhq.com/docs/ban-drop-column"
                }
            })
        );
    }

    #[test]
    fn test_column_omitted_when_absent() {
        let mut diagnostic = sample();
        diagnostic.location.column = None;
        let value = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(value["location"]["range"]["start"], json!({"line": 10}));
    }

    #[test]
    fn test_set_document() {
        let mut set = DiagnosticSet::new(
            Source {
                name: "squawk".to_string(),
                url: Some("https://github.com/sbdchd/squawk".to_string()),
            },
            "WARNING",
        );
        assert!(set.is_empty());
        set.push(sample());

        let value: serde_json::Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(value["source"]["name"], "squawk");
        assert_eq!(value["severity"], "WARNING");
        assert_eq!(value["diagnostics"].as_array().unwrap().len(), 1);

        let parsed: DiagnosticSet = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, set);
    }
}
