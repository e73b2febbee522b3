//! Error types for squawk-review operations

use thiserror::Error;

/// Every failure a run can hit. All of them are fatal: the run stops and
/// nothing is published.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to provision {tool}: {reason}")]
    ProvisioningFailed { tool: String, reason: String },

    #[error("Failed to run {tool} on {file}: {reason}")]
    ToolInvocationFailed {
        tool: String,
        file: String,
        reason: String,
    },

    #[error("Malformed analyzer report for {file}: {source}")]
    ReportParseFailed {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to publish diagnostics: {0}")]
    PublicationFailed(String),

    #[error("Failed to list pull request files: {0}")]
    ChangeSetUnavailable(String),

    #[error("Invalid file pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ReviewError {
    pub fn provisioning(tool: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ProvisioningFailed {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invocation(
        tool: impl Into<String>,
        file: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::ToolInvocationFailed {
            tool: tool.into(),
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for squawk-review operations
pub type Result<T> = std::result::Result<T, ReviewError>;
