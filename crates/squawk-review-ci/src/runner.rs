//! squawk execution for a single changed file.

use crate::config::LintOptions;
use crate::process::run_with_stdin;
use async_trait::async_trait;
use squawk_review_domain::{parse_report, ChangedFile, RawViolation, Result, ReviewError};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Anything that can lint one changed file.
#[async_trait]
pub trait Linter: Send + Sync {
    /// Violations found in `file`, in the order the analyzer reported them.
    async fn lint(&self, file: &ChangedFile) -> Result<Vec<RawViolation>>;
}

/// Runs the squawk binary once per file, feeding the file on stdin.
#[derive(Debug, Clone)]
pub struct SquawkRunner {
    binary: PathBuf,
    options: LintOptions,
    workdir: Option<PathBuf>,
}

impl SquawkRunner {
    pub fn new(binary: impl Into<PathBuf>, options: LintOptions) -> Self {
        Self {
            binary: binary.into(),
            options,
            workdir: None,
        }
    }

    /// Resolve file paths against `dir` (the checkout root) instead of the
    /// current directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// squawk arguments for `file`.
    pub fn args(&self, file: &str) -> Vec<String> {
        let mut args = vec![
            "--stdin-filepath".to_string(),
            file.to_string(),
            "--reporter".to_string(),
            "json".to_string(),
        ];

        if let Some(exclude) = &self.options.exclude {
            args.push("--exclude".to_string());
            args.push(exclude.clone());
        }

        if self.options.verbose {
            args.push("--verbose".to_string());
        }

        args
    }

    fn local_path(&self, file: &str) -> PathBuf {
        match &self.workdir {
            Some(dir) => dir.join(file),
            None => Path::new(file).to_path_buf(),
        }
    }

    /// Lint the on-disk content of `file`.
    ///
    /// A non-zero exit from squawk only means violations were found; it is
    /// logged, not raised.
    pub async fn run(&self, file: &str) -> Result<Vec<RawViolation>> {
        let content = tokio::fs::read(self.local_path(file)).await.map_err(|e| {
            ReviewError::invocation("squawk", file, format!("cannot read file: {e}"))
        })?;

        let mut command = Command::new(&self.binary);
        command.args(self.args(file));
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let output = run_with_stdin(command, content, self.options.timeout)
            .await
            .map_err(|e| ReviewError::invocation("squawk", file, e))?;

        debug!(
            file,
            exit_code = output.exit_code,
            duration_ms = output.duration_ms,
            "squawk finished"
        );
        if !output.stderr.trim().is_empty() {
            debug!(file, stderr = %output.stderr.trim(), "squawk stderr");
        }

        let violations = parse_report(file, &output.stdout)?;
        info!(file, violations = violations.len(), "Linted");
        Ok(violations)
    }
}

#[async_trait]
impl Linter for SquawkRunner {
    async fn lint(&self, file: &ChangedFile) -> Result<Vec<RawViolation>> {
        self.run(&file.path).await
    }
}
