//! Minimal GitHub REST client: post a PR comment, look up a PR's refs.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("plan-preview-action/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub request failed")]
    Http(#[from] reqwest::Error),
    #[error("GitHub returned {status} for {url}: {body}")]
    Status { status: StatusCode, url: String, body: String },
}

/// Head and base of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRefs {
    pub head_branch: String,
    pub head_commit: String,
    pub base_branch: String,
}

/// The GitHub calls a run needs.
pub trait GitHubApi {
    fn pull_request_refs(&self, owner: &str, repo: &str, number: u64)
        -> Result<PullRequestRefs, GitHubError>;

    /// Post `body` as a new comment and return the comment URL.
    fn create_comment(&self, owner: &str, repo: &str, number: u64, body: &str)
        -> Result<String, GitHubError>;
}

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, GitHubError> {
        let http = Client::builder().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    // Anonymous requests are allowed for dry runs against public repositories.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/vnd.github+json");
        if self.token.is_empty() {
            request
        } else {
            request.header(AUTHORIZATION, format!("Bearer {}", self.token))
        }
    }

    fn pulls_url(&self, owner: &str, repo: &str, number: u64) -> String {
        format!("{}/repos/{owner}/{repo}/pulls/{number}", self.api_url)
    }

    fn comments_url(&self, owner: &str, repo: &str, number: u64) -> String {
        format!("{}/repos/{owner}/{repo}/issues/{number}/comments", self.api_url)
    }
}

impl GitHubApi for GitHubClient {
    fn pull_request_refs(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestRefs, GitHubError> {
        let url = self.pulls_url(owner, repo, number);
        let resp = self.authorize(self.http.get(&url)).send()?;
        let pr: PullRequest = check_status(resp, &url)?.json()?;
        Ok(PullRequestRefs {
            head_branch: pr.head.ref_,
            head_commit: pr.head.sha,
            base_branch: pr.base.ref_,
        })
    }

    fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<String, GitHubError> {
        let url = self.comments_url(owner, repo, number);
        let resp = self.authorize(self.http.post(&url)).json(&json!({ "body": body })).send()?;
        let comment: IssueComment = check_status(resp, &url)?.json()?;
        Ok(comment.html_url)
    }
}

fn check_status(
    resp: reqwest::blocking::Response,
    url: &str,
) -> Result<reqwest::blocking::Response, GitHubError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(GitHubError::Status { status, url: url.to_string(), body })
}

#[derive(Deserialize)]
struct PullRequest {
    head: GitRef,
    base: GitRef,
}

#[derive(Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    ref_: String,
    sha: String,
}

#[derive(Deserialize)]
struct IssueComment {
    #[serde(default)]
    html_url: String,
}
