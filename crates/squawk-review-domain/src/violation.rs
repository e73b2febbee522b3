//! squawk `--reporter json` output schema.

use crate::error::{Result, ReviewError};
use serde::{Deserialize, Serialize};

/// A single violation as reported by squawk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawViolation {
    pub file: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub level: String,
    pub rule_name: String,
    #[serde(default)]
    pub messages: Vec<ViolationMessage>,
}

/// One entry of a violation's `messages` list.
///
/// squawk writes entries as `{"Note": "..."}` or `{"Help": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationMessage {
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "Help", default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ViolationMessage {
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            help: None,
        }
    }

    pub fn help(text: impl Into<String>) -> Self {
        Self {
            note: None,
            help: Some(text.into()),
        }
    }

    /// The entry's text: the note when present, otherwise the help.
    pub fn text(&self) -> Option<&str> {
        self.note.as_deref().or(self.help.as_deref())
    }
}

/// Parse squawk's stdout for `file`.
///
/// Blank output means the file has no violations.
pub fn parse_report(file: &str, stdout: &str) -> Result<Vec<RawViolation>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(stdout).map_err(|source| ReviewError::ReportParseFailed {
        file: file.to_string(),
        source,
    })
}
