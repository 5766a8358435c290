//! The remote fragment fetcher (spec §4.3, §5, §7).
//!
//! `RemoteFetcher` is an injected collaborator (spec §9) so tests can
//! supply a deterministic fake instead of hitting the network. The real
//! implementation is blocking (spec §5: "remote import fetches … are
//! blocking I/O"), with a per-request deadline and retry-with-backoff on
//! transient failure (spec §7: "retried with exponential backoff (3
//! attempts, 5/10/20s) before fatal").

use std::time::Duration;

/// The content and resolved commit SHA of one fetched remote fragment.
#[derive(Debug, Clone)]
pub struct RemoteFragment {
    pub content: String,
    pub commit_sha: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("timed out after {0:?} fetching {1}")]
    Timeout(Duration, String),
    #[error("transport error fetching {1}: {0}")]
    Transport(String, String),
    #[error("{0} not found in {1}")]
    NotFound(String, String),
}

/// Per-request deadline (spec §5: "default 30s").
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Total deadline across an entire import chain (spec §5: "total import
/// chain deadline 2min").
pub const CHAIN_DEADLINE: Duration = Duration::from_secs(120);

/// Exponential backoff delays between the 3 retry attempts (spec §7).
pub const RETRY_BACKOFF: [Duration; 3] = [
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(20),
];

pub trait RemoteFetcher: Send + Sync {
    /// Fetch `path` at `git_ref` (default branch HEAD if `None`) from
    /// `owner/repo`, returning its content and the commit it resolved to.
    fn fetch(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<RemoteFragment, FetchError>;
}

/// Retry `attempt` up to [`RETRY_BACKOFF`]'s length, sleeping between
/// attempts, before surfacing the last error fatally (spec §7).
pub fn fetch_with_retry(
    fetcher: &dyn RemoteFetcher,
    owner: &str,
    repo: &str,
    path: &str,
    git_ref: Option<&str>,
) -> Result<RemoteFragment, FetchError> {
    let mut last_err = None;
    for (attempt, backoff) in RETRY_BACKOFF.iter().enumerate() {
        match fetcher.fetch(owner, repo, path, git_ref) {
            Ok(fragment) => return Ok(fragment),
            Err(err) => {
                tracing::warn!(owner, repo, path, attempt, "remote import fetch failed, retrying");
                last_err = Some(err);
                if attempt + 1 < RETRY_BACKOFF.len() {
                    std::thread::sleep(*backoff);
                }
            }
        }
    }
    Err(last_err.expect("RETRY_BACKOFF is non-empty"))
}

/// Fetches fragments from GitHub's raw content + REST commit-lookup APIs.
pub struct GithubRemoteFetcher {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl GithubRemoteFetcher {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_DEADLINE)
            .user_agent("gh-aw-compiler")
            .build()
            .expect("building the blocking HTTP client cannot fail with these options");
        Self { client, token }
    }

    fn authed(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn resolve_commit_sha(&self, owner: &str, repo: &str, git_ref: &str) -> Result<String, FetchError> {
        let url = format!("https://api.github.com/repos/{owner}/{repo}/commits/{git_ref}");
        let target = format!("{owner}/{repo}@{git_ref}");
        let response = self
            .authed(self.client.get(&url).header("Accept", "application/vnd.github.sha"))
            .send()
            .map_err(|e| FetchError::Transport(e.to_string(), target.clone()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(target.clone(), url));
        }
        if !response.status().is_success() {
            return Err(FetchError::Transport(
                format!("status {}", response.status()),
                target,
            ));
        }
        response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string(), target))
            .map(|sha| sha.trim().to_string())
    }
}

impl RemoteFetcher for GithubRemoteFetcher {
    fn fetch(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<RemoteFragment, FetchError> {
        let git_ref = git_ref.unwrap_or("HEAD");
        let target = format!("{owner}/{repo}/{path}@{git_ref}");
        let url = format!("https://raw.githubusercontent.com/{owner}/{repo}/{git_ref}/{path}");

        let response = self
            .authed(self.client.get(&url))
            .send()
            .map_err(|e| FetchError::Transport(e.to_string(), target.clone()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(target, url));
        }
        if !response.status().is_success() {
            return Err(FetchError::Transport(
                format!("status {}", response.status()),
                target,
            ));
        }
        let content = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string(), target.clone()))?;
        let commit_sha = self.resolve_commit_sha(owner, repo, git_ref)?;

        Ok(RemoteFragment { content, commit_sha })
    }
}
