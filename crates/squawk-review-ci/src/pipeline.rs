//! Review run orchestration: filter, lint, translate, publish.

use crate::publisher::ReportSink;
use crate::runner::Linter;
use futures::{stream, StreamExt, TryStreamExt};
use squawk_review_domain::{
    filter, squawk_source, translate, ChangedFile, DiagnosticSet, FilePattern, Result,
};
use std::time::Instant;
use tracing::info;

/// Document-level `severity` of the published rdjson set.
pub const DEFAULT_SEVERITY: &str = "WARNING";

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files that were linted.
    pub eligible_files: usize,

    /// Number of diagnostics published.
    pub diagnostics: usize,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Lints the eligible files of a changeset and publishes the result once.
#[derive(Debug, Clone)]
pub struct LintPipeline {
    pattern: FilePattern,
    jobs: usize,
}

impl LintPipeline {
    pub fn new(pattern: FilePattern) -> Self {
        Self {
            pattern,
            jobs: 1,
        }
    }

    /// Run up to `jobs` linters at once. Output order does not depend on it.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Lint every eligible file and collect the diagnostics in file order,
    /// then violation order within each file.
    ///
    /// The first error aborts the remaining work.
    pub async fn collect(
        &self,
        files: &[ChangedFile],
        linter: &dyn Linter,
    ) -> Result<DiagnosticSet> {
        let eligible: Vec<&ChangedFile> = filter(files, &self.pattern).collect();
        info!(
            changed = files.len(),
            eligible = eligible.len(),
            pattern = %self.pattern,
            "Selected files to lint"
        );

        // One slot per file; `buffered` yields in input order.
        let slots: Vec<_> = stream::iter(eligible)
            .map(move |file| async move {
                info!(file = %file.path, "Linting");
                linter.lint(file).await
            })
            .buffered(self.jobs)
            .try_collect()
            .await?;

        let mut set = DiagnosticSet::new(squawk_source(), DEFAULT_SEVERITY);
        set.extend(slots.iter().flatten().map(translate));
        Ok(set)
    }

    /// Collect diagnostics and hand them to `sink` in a single call.
    ///
    /// Nothing is published when any file fails.
    pub async fn run(
        &self,
        files: &[ChangedFile],
        linter: &dyn Linter,
        sink: &dyn ReportSink,
    ) -> Result<RunSummary> {
        let start = Instant::now();

        let set = self.collect(files, linter).await?;
        let eligible_files = filter(files, &self.pattern).count();
        let diagnostics = set.len();

        sink.publish(&set).await?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(eligible_files, diagnostics, duration_ms, "Review run completed");

        Ok(RunSummary {
            eligible_files,
            diagnostics,
            duration_ms,
        })
    }
}
