//! Running `pipectl plan-preview` and loading its result.

use crate::domain::{EventDescriptor, PlanPreviewResult};
use crate::utils::duration::format_go_duration;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_PIPECTL: &str = "pipectl";

/// Extra time pipectl gets to honour `--timeout` on its own before it is killed.
const KILL_GRACE: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything pipectl needs to plan one pull request.
#[derive(Debug, Clone)]
pub struct PlanPreviewRequest {
    pub repo_remote_url: String,
    pub base_branch: String,
    pub head_branch: String,
    pub head_commit: String,
    pub address: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl PlanPreviewRequest {
    pub fn for_event(event: &EventDescriptor, address: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            repo_remote_url: event.repo_remote.clone(),
            base_branch: event.base_branch.clone(),
            head_branch: event.head_branch.clone(),
            head_commit: event.head_commit.clone(),
            address: address.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// Arguments for `pipectl`, writing the result to `out`.
    pub fn args(&self, out: &Path) -> Vec<String> {
        vec![
            "plan-preview".to_string(),
            "--repo-remote-url".to_string(),
            self.repo_remote_url.clone(),
            "--base-branch".to_string(),
            self.base_branch.clone(),
            "--head-branch".to_string(),
            self.head_branch.clone(),
            "--head-commit".to_string(),
            self.head_commit.clone(),
            "--address".to_string(),
            self.address.clone(),
            "--api-key".to_string(),
            self.api_key.clone(),
            "--timeout".to_string(),
            format_go_duration(self.timeout),
            "--out".to_string(),
            out.display().to_string(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum PlanPreviewError {
    #[error("failed to prepare a scratch directory for pipectl")]
    Workspace(#[source] std::io::Error),
    #[error("failed to execute {}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("timeout {0:?} is too large")]
    TimeoutTooLarge(Duration),
    #[error("failed while waiting for pipectl")]
    Wait(#[source] std::io::Error),
    #[error("failed to execute pipectl command ({status}) ({output})")]
    Failed { status: ExitStatus, output: String },
    #[error("pipectl did not finish within {timeout:?} ({output})")]
    TimedOut { timeout: Duration, output: String },
    #[error("failed to read result file {}", .path.display())]
    ReadResult {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse result file")]
    ParseResult(#[source] serde_json::Error),
}

/// Source of plan-preview results.
pub trait PlanPreviewer {
    fn plan_preview(&self, request: &PlanPreviewRequest) -> Result<PlanPreviewResult, PlanPreviewError>;
}

/// Runs the pipectl binary as a child process.
pub struct PipectlRunner {
    program: PathBuf,
    kill_grace: Duration,
}

impl PipectlRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), kill_grace: KILL_GRACE }
    }

    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }
}

impl Default for PipectlRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PIPECTL)
    }
}

impl PlanPreviewer for PipectlRunner {
    fn plan_preview(&self, request: &PlanPreviewRequest) -> Result<PlanPreviewResult, PlanPreviewError> {
        let deadline = request
            .timeout
            .checked_add(self.kill_grace)
            .and_then(|budget| Instant::now().checked_add(budget))
            .ok_or(PlanPreviewError::TimeoutTooLarge(request.timeout))?;

        let dir = tempfile::tempdir().map_err(PlanPreviewError::Workspace)?;
        let out_path = dir.path().join("result.json");

        // Combined stdout and stderr, in pipectl's own order.
        let mut log = tempfile::tempfile().map_err(PlanPreviewError::Workspace)?;
        let stderr = log.try_clone().map_err(PlanPreviewError::Workspace)?;
        let stdout = log.try_clone().map_err(PlanPreviewError::Workspace)?;

        tracing::debug!(
            "Running {} plan-preview for {} ({} -> {})",
            self.program.display(),
            request.head_commit,
            request.head_branch,
            request.base_branch
        );
        let mut child = Command::new(&self.program)
            .args(request.args(&out_path))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| PlanPreviewError::Spawn { program: self.program.clone(), source })?;

        let status = loop {
            if let Some(status) = child.try_wait().map_err(PlanPreviewError::Wait)? {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::warn!("pipectl exceeded its deadline, killing pid {}", child.id());
                let _ = child.kill();
                let _ = child.wait();
                return Err(PlanPreviewError::TimedOut {
                    timeout: request.timeout,
                    output: read_log(&mut log),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let output = read_log(&mut log);
        if !status.success() {
            return Err(PlanPreviewError::Failed { status, output });
        }
        tracing::info!("{}", output);

        load_result(&out_path)
    }
}

/// Load a result file written by `pipectl plan-preview --out`.
pub fn load_result(path: &Path) -> Result<PlanPreviewResult, PlanPreviewError> {
    let data = std::fs::read(path)
        .map_err(|source| PlanPreviewError::ReadResult { path: path.to_path_buf(), source })?;
    PlanPreviewResult::from_json(&data).map_err(PlanPreviewError::ParseResult)
}

fn read_log(log: &mut File) -> String {
    let mut buf = Vec::new();
    let read = log.seek(SeekFrom::Start(0)).and_then(|_| log.read_to_end(&mut buf));
    if let Err(e) = read {
        tracing::debug!("Failed to read pipectl output: {}", e);
    }
    String::from_utf8_lossy(&buf).trim_end().to_string()
}
