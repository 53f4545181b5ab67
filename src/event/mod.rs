//! GitHub Actions event parsing.
//!
//! Only `pull_request` and `issue_comment` events are supported. The event
//! name and payload location are handed in through [`EventSource`]; nothing
//! here reads the process environment.

use crate::domain::EventDescriptor;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PULL_REQUEST_EVENT: &str = "pull_request";
pub const ISSUE_COMMENT_EVENT: &str = "issue_comment";

/// Where the triggering event comes from.
#[derive(Debug, Clone)]
pub struct EventSource {
    pub event_name: String,
    pub payload_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("unexpected event {0}, only \"pull_request\" and \"issue_comment\" event are supported")]
    Unsupported(String),
    #[error("failed to read event payload {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {event} event payload")]
    Parse {
        event: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("issue #{0} is not a pull request")]
    NotPullRequest(u64),
}

pub fn parse_event(source: &EventSource) -> Result<EventDescriptor, EventError> {
    check_supported(&source.event_name)?;
    let payload = read_payload(&source.payload_path)?;
    parse_payload(&source.event_name, &payload)
}

/// Parse an already loaded webhook payload.
pub fn parse_payload(event_name: &str, payload: &[u8]) -> Result<EventDescriptor, EventError> {
    check_supported(event_name)?;
    let parse_err =
        |source: serde_json::Error| EventError::Parse { event: event_name.to_string(), source };

    if event_name == PULL_REQUEST_EVENT {
        let e: PullRequestEvent = serde_json::from_slice(payload).map_err(parse_err)?;
        return Ok(EventDescriptor {
            owner: e.repository.owner.login,
            repo: e.repository.name,
            repo_remote: e.repository.ssh_url,
            pr_number: e.number,
            head_branch: e.pull_request.head.ref_,
            head_commit: e.pull_request.head.sha,
            base_branch: e.pull_request.base.ref_,
            ..Default::default()
        });
    }

    let e: IssueCommentEvent = serde_json::from_slice(payload).map_err(parse_err)?;
    if e.issue.pull_request.is_none() {
        return Err(EventError::NotPullRequest(e.issue.number));
    }
    Ok(EventDescriptor {
        owner: e.repository.owner.login,
        repo: e.repository.name,
        repo_remote: e.repository.ssh_url,
        pr_number: e.issue.number,
        is_comment: true,
        sender_login: e.sender.login,
        comment_body: e.comment.body,
        ..Default::default()
    })
}

fn check_supported(event_name: &str) -> Result<(), EventError> {
    if event_name != PULL_REQUEST_EVENT && event_name != ISSUE_COMMENT_EVENT {
        return Err(EventError::Unsupported(event_name.to_string()));
    }
    Ok(())
}

fn read_payload(path: &Path) -> Result<Vec<u8>, EventError> {
    std::fs::read(path).map_err(|source| EventError::Read { path: path.to_path_buf(), source })
}

#[derive(Deserialize)]
struct PullRequestEvent {
    number: u64,
    pull_request: PullRequest,
    repository: Repository,
}

#[derive(Deserialize)]
struct IssueCommentEvent {
    issue: Issue,
    comment: Comment,
    repository: Repository,
    sender: User,
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
struct Issue {
    number: u64,
    /// Present only when the issue is a pull request.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Comment {
    #[serde(default)]
    body: String,
}

#[derive(Deserialize)]
struct Repository {
    name: String,
    #[serde(default)]
    ssh_url: String,
    owner: User,
}

#[derive(Deserialize)]
struct User {
    login: String,
}
