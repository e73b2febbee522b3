//! squawk-review - lint the migrations changed in a pull request
//!
//! Installs pinned squawk and reviewdog binaries, lints every changed file
//! that matches `--targets`, and publishes the findings as review comments.
//!
//! Every option falls back to the environment a GitHub Action step provides
//! (`INPUT_*`, `GITHUB_*`, `RUNNER_*`).

mod telemetry;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::Parser;
use squawk_review_ci::pull_request::number_from_event;
use squawk_review_ci::{
    ChangeSetSource, GithubPullRequest, LintOptions, LintPipeline, PullRequestRef, ReporterConfig,
    ReviewdogPublisher, RunConfig, Secret, SquawkRunner,
};
use squawk_review_domain::{FilePattern, Platform};
use squawk_review_toolcache::{ToolProvisioner, ToolSpec};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "squawk-review")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Lint changed migration files with squawk and report through reviewdog",
    long_about = None
)]
struct Cli {
    /// squawk release tag to install (e.g. v0.26.0)
    #[arg(long, env = "INPUT_SQUAWK_VERSION")]
    squawk_version: String,

    /// reviewdog release to install (e.g. 0.20.3)
    #[arg(long, env = "INPUT_REVIEWDOG_VERSION")]
    reviewdog_version: String,

    /// Expected SHA-256 of the squawk asset
    #[arg(long, env = "INPUT_SQUAWK_SHA256")]
    squawk_sha256: Option<String>,

    /// Expected SHA-256 of the reviewdog asset
    #[arg(long, env = "INPUT_REVIEWDOG_SHA256")]
    reviewdog_sha256: Option<String>,

    /// Glob selecting the files to lint (e.g. "migrations/*.sql")
    #[arg(long, env = "INPUT_TARGETS")]
    targets: String,

    /// Rules to exclude, forwarded to squawk
    #[arg(long, env = "INPUT_EXCLUDE")]
    exclude: Option<String>,

    /// reviewdog reporter
    #[arg(long, env = "INPUT_REPORTER", default_value = "github-pr-review")]
    reporter: String,

    /// reviewdog report level (info, warning, error)
    #[arg(long, env = "INPUT_LEVEL")]
    level: Option<String>,

    /// Make reviewdog exit non-zero when it reports findings
    #[arg(long, env = "INPUT_FAIL_ON_ERROR", value_parser = FalseyValueParser::new())]
    fail_on_error: bool,

    /// Token for the GitHub API and reviewdog
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Pull request number (read from the workflow event when omitted)
    #[arg(long)]
    pull_request: Option<u64>,

    /// Workflow event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    github_api_url: String,

    /// Checkout root the changed paths are relative to
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Directory to download tools into (a temporary directory when unset)
    #[arg(long, env = "RUNNER_TEMP")]
    tool_dir: Option<PathBuf>,

    /// Number of squawk processes to run at once
    #[arg(long, env = "INPUT_JOBS", default_value_t = 1)]
    jobs: usize,

    /// Kill squawk when a single file takes longer than this
    #[arg(long, env = "INPUT_LINT_TIMEOUT_SECS")]
    lint_timeout_secs: Option<u64>,

    /// Debug logging and verbose squawk output
    #[arg(long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig> {
        let targets = FilePattern::new(&self.targets).context("Invalid --targets pattern")?;

        let lint = LintOptions::default()
            .with_exclude(self.exclude.clone())
            .verbose(self.debug)
            .with_timeout(self.lint_timeout_secs.map(Duration::from_secs));

        let reporter = ReporterConfig::new(&self.reporter, Secret::new(&self.github_token))
            .with_level(self.level.clone())
            .fail_on_error(self.fail_on_error);

        Ok(RunConfig {
            squawk_version: self.squawk_version.clone(),
            squawk_sha256: non_blank(&self.squawk_sha256),
            reviewdog_version: self.reviewdog_version.clone(),
            reviewdog_sha256: non_blank(&self.reviewdog_sha256),
            targets,
            lint,
            reporter,
            jobs: self.jobs.max(1),
        })
    }

    fn pull_request_ref(&self) -> Result<PullRequestRef> {
        let number = match (self.pull_request, &self.event_path) {
            (Some(number), _) => number,
            (None, Some(path)) => number_from_event(path)?,
            (None, None) => {
                anyhow::bail!("No pull request: pass --pull-request or set GITHUB_EVENT_PATH")
            }
        };
        Ok(PullRequestRef::new(&self.repository, number)?)
    }
}

/// Action inputs arrive as empty strings when not set.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing(cli.json, cli.debug);

    let config = cli.run_config()?;
    let pull_request = cli.pull_request_ref()?;
    debug!(?config, %pull_request, "Configuration loaded");

    // Keeps a temporary tool directory alive until the run ends.
    let (tool_root, _tool_guard) = match &cli.tool_dir {
        Some(dir) => (dir.join("squawk-review"), None),
        None => {
            let tmp = tempfile::tempdir().context("Failed to create tool directory")?;
            (tmp.path().to_path_buf(), Some(tmp))
        }
    };

    let source = GithubPullRequest::new(
        &cli.github_api_url,
        pull_request,
        config.reporter.credential.clone(),
    )?;
    review(&config, &tool_root, &cli.workspace, &source).await
}

async fn review(
    config: &RunConfig,
    tool_root: &Path,
    workspace: &Path,
    source: &dyn ChangeSetSource,
) -> Result<()> {
    let platform = Platform::host().context("Cannot select tool binaries for this runner")?;

    let squawk_spec = ToolSpec::squawk(&config.squawk_version, &platform)
        .with_sha256(config.squawk_sha256.clone());
    let reviewdog_spec = ToolSpec::reviewdog(&config.reviewdog_version, &platform)
        .with_sha256(config.reviewdog_sha256.clone());

    let provisioner = ToolProvisioner::new(tool_root)?;
    let (squawk, reviewdog) = tokio::try_join!(
        provisioner.acquire(&squawk_spec),
        provisioner.acquire(&reviewdog_spec)
    )
    .context("Failed to install tools")?;

    info!("Linting modified migration files");
    let files = source.changed_files().await?;

    let linter = SquawkRunner::new(&squawk.path, config.lint.clone()).in_dir(workspace);
    let publisher =
        ReviewdogPublisher::new(&reviewdog.path, config.reporter.clone()).in_dir(workspace);

    let summary = LintPipeline::new(config.targets.clone())
        .with_jobs(config.jobs)
        .run(&files, &linter, &publisher)
        .await?;

    info!(
        files = summary.eligible_files,
        diagnostics = summary.diagnostics,
        duration_ms = summary.duration_ms,
        "Review published"
    );
    Ok(())
}
