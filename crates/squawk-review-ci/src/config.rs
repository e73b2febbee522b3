//! Run configuration.
//!
//! Built once at the entry point and passed down explicitly; components never
//! read the process environment themselves.

use squawk_review_domain::FilePattern;
use std::time::Duration;

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for handing to an HTTP client or child process.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Options forwarded to every squawk invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Rules to exclude, passed verbatim as `--exclude`.
    pub exclude: Option<String>,

    /// Pass `--verbose`.
    pub verbose: bool,

    /// Kill squawk after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl LintOptions {
    /// Empty exclude values count as "not configured".
    pub fn with_exclude(mut self, exclude: Option<String>) -> Self {
        self.exclude = exclude.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How reviewdog should publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Value of reviewdog's `-name`.
    pub source_name: String,

    /// Value of reviewdog's `-reporter` (e.g. `github-pr-review`).
    pub channel: String,

    /// Exported to reviewdog as `REVIEWDOG_GITHUB_API_TOKEN`.
    pub credential: Secret,

    /// Value of reviewdog's `-level`, when set.
    pub level: Option<String>,

    /// Pass `-fail-on-error`.
    pub fail_on_error: bool,
}

impl ReporterConfig {
    pub fn new(channel: impl Into<String>, credential: Secret) -> Self {
        Self {
            source_name: "squawk".to_string(),
            channel: channel.into(),
            credential,
            level: None,
            fail_on_error: false,
        }
    }

    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = level.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn fail_on_error(mut self, enabled: bool) -> Self {
        self.fail_on_error = enabled;
        self
    }
}

/// Everything one review run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub squawk_version: String,
    pub squawk_sha256: Option<String>,
    pub reviewdog_version: String,
    pub reviewdog_sha256: Option<String>,

    /// Inclusion glob for changed files.
    pub targets: FilePattern,

    pub lint: LintOptions,
    pub reporter: ReporterConfig,

    /// Maximum number of concurrent squawk processes.
    pub jobs: usize,
}
