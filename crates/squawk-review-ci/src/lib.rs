//! squawk-review CI - diff-scoped migration linting
//!
//! Provides the pieces of a pull request review run:
//! - Lists the pull request's changed files (GitHub REST API)
//! - Runs squawk on each eligible file, feeding it on stdin
//! - Publishes the translated diagnostics through reviewdog, once

pub mod config;
pub mod pipeline;
pub mod process;
pub mod publisher;
pub mod pull_request;
pub mod runner;

// Re-export key types
pub use config::{LintOptions, ReporterConfig, RunConfig, Secret};
pub use pipeline::{LintPipeline, RunSummary};
pub use process::ToolOutput;
pub use publisher::{ReportSink, ReviewdogPublisher};
pub use pull_request::{ChangeSetSource, GithubPullRequest, PullRequestRef};
pub use runner::{Linter, SquawkRunner};
