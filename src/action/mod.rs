//! One bot run: event in, comment out.

use crate::config::Settings;
use crate::domain::EventDescriptor;
use crate::github::GitHubApi;
use crate::planner::{PlanPreviewRequest, PlanPreviewer};
use crate::render::render_comment;
use anyhow::{Context, Result};

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The comment was not a plan-preview command.
    Skipped,
    /// Dry run: the body that would have been posted.
    Rendered(String),
    /// The report was posted; holds the comment URL.
    Commented(String),
}

/// Run plan-preview for `event` and report back on its pull request.
///
/// Any failure before the comment is posted aborts the run; nothing is
/// posted for a failed planner invocation.
pub fn run_plan_preview(
    event: EventDescriptor,
    settings: &Settings,
    planner: &dyn PlanPreviewer,
    github: &dyn GitHubApi,
) -> Result<Outcome> {
    if event.is_comment && !is_trigger_command(&event.comment_body, &settings.trigger_command) {
        tracing::info!(
            "Comment on {}#{} is not {:?}, nothing to do",
            event.full_name(),
            event.pr_number,
            settings.trigger_command
        );
        return Ok(Outcome::Skipped);
    }

    let event = if event.has_refs() {
        event
    } else {
        let refs = github
            .pull_request_refs(&event.owner, &event.repo, event.pr_number)
            .with_context(|| {
                format!("Failed to look up pull request {}#{}", event.full_name(), event.pr_number)
            })?;
        event.with_pull_request_refs(refs.head_branch, refs.head_commit, refs.base_branch)
    };

    tracing::info!(
        "Planning {}#{} at {} ({} -> {})",
        event.full_name(),
        event.pr_number,
        event.head_commit,
        event.head_branch,
        event.base_branch
    );
    let request = PlanPreviewRequest::for_event(
        &event,
        &settings.address,
        &settings.api_key,
        settings.timeout,
    );
    let result = planner.plan_preview(&request).context("Failed to run plan-preview")?;
    tracing::info!(
        "plan-preview finished: {} planned, {} failed applications, {} failed pipeds",
        result.applications.len(),
        result.failure_applications.len(),
        result.failure_pipeds.len()
    );

    let body = render_comment(&event, &result);
    if settings.dry_run {
        return Ok(Outcome::Rendered(body));
    }

    let url = github
        .create_comment(&event.owner, &event.repo, event.pr_number, &body)
        .with_context(|| {
            format!("Failed to comment on {}#{}", event.full_name(), event.pr_number)
        })?;
    tracing::info!("Posted plan-preview result: {}", url);
    Ok(Outcome::Commented(url))
}

/// Whether a comment asks for a plan preview, e.g. `/pipecd plan-preview`.
pub fn is_trigger_command(body: &str, command: &str) -> bool {
    match body.trim_start().strip_prefix(command) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}
