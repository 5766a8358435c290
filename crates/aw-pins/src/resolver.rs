//! Resolves an `owner/repo@ref` version string to a 40-hex commit SHA
//! (spec §4.9). An injected collaborator, same shape as
//! `aw_imports::fetch::RemoteFetcher`, so tests supply a deterministic
//! fake instead of hitting the network.

use std::time::Duration;

use crate::error::PinError;

const REQUEST_DEADLINE: Duration = Duration::from_secs(30);

pub trait CommitResolver: Send + Sync {
    fn resolve(&self, owner: &str, repo: &str, git_ref: &str) -> Result<String, PinError>;
}

pub struct GithubCommitResolver {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl GithubCommitResolver {
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
}

impl CommitResolver for GithubCommitResolver {
    fn resolve(&self, owner: &str, repo: &str, git_ref: &str) -> Result<String, PinError> {
        let target = format!("{owner}/{repo}@{git_ref}");
        let url = format!("https://api.github.com/repos/{owner}/{repo}/commits/{git_ref}");
        let response = self
            .authed(self.client.get(&url).header("Accept", "application/vnd.github.sha"))
            .send()
            .map_err(|e| PinError::Transport(e.to_string(), target.clone()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PinError::NotFound(url, target));
        }
        if !response.status().is_success() {
            return Err(PinError::Transport(format!("status {}", response.status()), target));
        }
        response
            .text()
            .map_err(|e| PinError::Transport(e.to_string(), target))
            .map(|sha| sha.trim().to_string())
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;

    /// Deterministic in-memory resolver for tests.
    pub struct FakeResolver {
        pub shas: HashMap<(String, String, String), String>,
    }

    impl CommitResolver for FakeResolver {
        fn resolve(&self, owner: &str, repo: &str, git_ref: &str) -> Result<String, PinError> {
            self.shas
                .get(&(owner.to_string(), repo.to_string(), git_ref.to_string()))
                .cloned()
                .ok_or_else(|| PinError::NotFound(git_ref.to_string(), format!("{owner}/{repo}")))
        }
    }
}
