//! Pull request file listings from the GitHub REST API.

use crate::config::Secret;
use async_trait::async_trait;
use serde::Deserialize;
use squawk_review_domain::{ChangedFile, Result, ReviewError};
use std::path::Path;
use tracing::debug;

/// Page size requested from the listing endpoint (the API maximum).
pub const PER_PAGE: usize = 100;

/// Where the changed-file listing of a run comes from.
#[async_trait]
pub trait ChangeSetSource: Send + Sync {
    /// Changed files in the pull request's own diff order.
    async fn changed_files(&self) -> Result<Vec<ChangedFile>>;
}

/// `owner/repo#number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// Build from an `owner/repo` string such as `GITHUB_REPOSITORY`.
    pub fn new(repository: &str, number: u64) -> Result<Self> {
        match repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    number,
                })
            }
            _ => Err(ReviewError::ChangeSetUnavailable(format!(
                "repository must look like owner/repo, got {repository:?}"
            ))),
        }
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Deserialize)]
struct EventPullRequest {
    number: u64,
}

/// Pull request number from a workflow event payload (`GITHUB_EVENT_PATH`).
pub fn number_from_event(path: &Path) -> Result<u64> {
    let raw = std::fs::read(path).map_err(|e| {
        ReviewError::ChangeSetUnavailable(format!("cannot read event {}: {e}", path.display()))
    })?;
    let payload: EventPayload = serde_json::from_slice(&raw).map_err(|e| {
        ReviewError::ChangeSetUnavailable(format!("cannot parse event {}: {e}", path.display()))
    })?;

    payload
        .pull_request
        .map(|pr| pr.number)
        .ok_or_else(|| {
            ReviewError::ChangeSetUnavailable("event is not a pull request event".to_string())
        })
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Deserialize)]
struct ListedFile {
    filename: String,
    additions: u64,
    changes: u64,
}

impl From<ListedFile> for ChangedFile {
    fn from(file: ListedFile) -> Self {
        ChangedFile::new(file.filename, file.additions, file.changes)
    }
}

/// Lists a pull request's files through the GitHub REST API.
pub struct GithubPullRequest {
    client: reqwest::Client,
    api_url: String,
    pull_request: PullRequestRef,
    token: Secret,
}

impl GithubPullRequest {
    pub fn new(api_url: &str, pull_request: PullRequestRef, token: Secret) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("squawk-review/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReviewError::ChangeSetUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            pull_request,
            token,
        })
    }

    fn files_url(&self, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}/files?per_page={PER_PAGE}&page={page}",
            self.api_url, self.pull_request.owner, self.pull_request.repo, self.pull_request.number
        )
    }

    async fn fetch_page(&self, page: usize) -> Result<Vec<ListedFile>> {
        let unavailable = |e: reqwest::Error| ReviewError::ChangeSetUnavailable(e.to_string());

        let mut request = self
            .client
            .get(self.files_url(page))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if !self.token.is_empty() {
            request = request.bearer_auth(self.token.expose());
        }

        request
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)
    }
}

#[async_trait]
impl ChangeSetSource for GithubPullRequest {
    async fn changed_files(&self) -> Result<Vec<ChangedFile>> {
        debug!(pull_request = %self.pull_request, "Listing files");

        let mut files = Vec::new();
        for page in 1.. {
            let listed = self.fetch_page(page).await?;
            let last = listed.len() < PER_PAGE;
            files.extend(listed.into_iter().map(ChangedFile::from));
            if last {
                break;
            }
        }

        debug!(pull_request = %self.pull_request, files = files.len(), "Listed files");
        Ok(files)
    }
}
