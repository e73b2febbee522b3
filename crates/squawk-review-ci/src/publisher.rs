//! Diagnostic publication through reviewdog.

use crate::config::ReporterConfig;
use crate::process::run_with_stdin;
use async_trait::async_trait;
use squawk_review_domain::{DiagnosticSet, Result, ReviewError};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Environment variable reviewdog reads its GitHub token from.
pub const TOKEN_ENV: &str = "REVIEWDOG_GITHUB_API_TOKEN";

/// Terminal destination of a run's diagnostics.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, diagnostics: &DiagnosticSet) -> Result<()>;
}

/// Pipes an rdjson document into reviewdog.
#[derive(Debug, Clone)]
pub struct ReviewdogPublisher {
    binary: PathBuf,
    config: ReporterConfig,
    workdir: Option<PathBuf>,
}

impl ReviewdogPublisher {
    pub fn new(binary: impl Into<PathBuf>, config: ReporterConfig) -> Self {
        Self {
            binary: binary.into(),
            config,
            workdir: None,
        }
    }

    /// Run reviewdog from the checkout root.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "rdjson".to_string(),
            "-name".to_string(),
            self.config.source_name.clone(),
            "-reporter".to_string(),
            self.config.channel.clone(),
        ];

        if let Some(level) = &self.config.level {
            args.push("-level".to_string());
            args.push(level.clone());
        }

        if self.config.fail_on_error {
            args.push("-fail-on-error".to_string());
        }

        args
    }
}

#[async_trait]
impl ReportSink for ReviewdogPublisher {
    async fn publish(&self, diagnostics: &DiagnosticSet) -> Result<()> {
        let payload = diagnostics.to_json().map_err(|e| {
            ReviewError::PublicationFailed(format!("cannot serialize diagnostics: {e}"))
        })?;

        let mut command = Command::new(&self.binary);
        command
            .args(self.args())
            .env(TOKEN_ENV, self.config.credential.expose());
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        info!(
            reporter = %self.config.channel,
            diagnostics = diagnostics.len(),
            "Publishing diagnostics"
        );

        let output = run_with_stdin(command, payload.into_bytes(), None)
            .await
            .map_err(|e| ReviewError::PublicationFailed(format!("cannot run reviewdog: {e}")))?;

        if !output.stdout.trim().is_empty() {
            info!(output = %output.stdout.trim(), "reviewdog");
        }

        if !output.success() {
            return Err(ReviewError::PublicationFailed(format!(
                "reviewdog exited with code {}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }

        debug!(duration_ms = output.duration_ms, "reviewdog finished");
        Ok(())
    }
}
