//! Run command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::action::{run_plan_preview, Outcome};
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::event::{parse_event, EventSource};
use crate::github::GitHubClient;
use crate::planner::PipectlRunner;

#[derive(Args)]
pub struct RunArgs {
    /// Name of the triggering event (pull_request or issue_comment)
    #[arg(long, env = "GITHUB_EVENT_NAME", value_name = "NAME")]
    pub event_name: String,

    /// Path to the webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH", value_name = "FILE")]
    pub event_path: PathBuf,

    /// PipeCD control-plane address
    #[arg(long, env = "INPUT_ADDRESS", value_name = "HOST:PORT")]
    pub address: Option<String>,

    /// API key pipectl uses to talk to the control-plane
    #[arg(long, env = "INPUT_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// GitHub token used to comment on the pull request
    #[arg(long, env = "INPUT_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Maximum time plan-preview may take (e.g. 5m, 90s)
    #[arg(long, env = "INPUT_TIMEOUT", value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Path to the pipectl binary
    #[arg(long, env = "INPUT_PIPECTL", value_name = "PATH")]
    pub pipectl: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub github_api_url: Option<String>,

    /// Comment prefix that requests a plan preview
    #[arg(long, value_name = "TEXT")]
    pub trigger: Option<String>,

    /// Path to config file (plan-preview.toml or .plan-preview.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the comment instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let source = EventSource { event_name: args.event_name, payload_path: args.event_path };
    let event = parse_event(&source).context("Failed to parse GitHub event")?;
    tracing::debug!("Parsed event: {:?}", event);

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let settings = merge_cli_with_config(
        CliOverrides {
            address: args.address,
            api_key: args.api_key,
            token: args.token,
            timeout: args.timeout,
            pipectl_path: args.pipectl,
            github_api_url: args.github_api_url,
            trigger_command: args.trigger,
            dry_run: args.dry_run,
        },
        file_config,
    )?;

    let planner = PipectlRunner::new(settings.pipectl_path.clone());
    let github = GitHubClient::new(&settings.github_api_url, &settings.token)
        .context("Failed to create GitHub client")?;

    match run_plan_preview(event, &settings, &planner, &github)? {
        Outcome::Skipped => {}
        Outcome::Rendered(body) => print!("{body}"),
        Outcome::Commented(url) => println!("Commented plan-preview result: {url}"),
    }
    Ok(())
}
