//! Merge CLI arguments (with their environment fallbacks) over file config.

use super::loader::FileConfig;
use crate::github::DEFAULT_API_URL;
use crate::planner::DEFAULT_PIPECTL;
use crate::utils::duration::parse_go_duration;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: &str = "5m";
pub const DEFAULT_TRIGGER_COMMAND: &str = "/pipecd plan-preview";

/// Values supplied on the command line or through `INPUT_*` variables.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub api_key: Option<String>,
    pub token: Option<String>,
    pub timeout: Option<String>,
    pub pipectl_path: Option<PathBuf>,
    pub github_api_url: Option<String>,
    pub trigger_command: Option<String>,
    pub dry_run: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub address: String,
    pub api_key: String,
    /// Empty only for dry runs.
    pub token: String,
    pub timeout: Duration,
    pub pipectl_path: PathBuf,
    pub github_api_url: String,
    pub trigger_command: String,
    pub dry_run: bool,
}

pub fn merge_cli_with_config(cli: CliOverrides, file: FileConfig) -> Result<Settings> {
    let address = non_empty(cli.address)
        .or(non_empty(file.address))
        .context("control-plane address is required (--address or INPUT_ADDRESS)")?;
    let api_key = non_empty(cli.api_key)
        .context("pipectl API key is required (--api-key or INPUT_API_KEY)")?;
    let token = match non_empty(cli.token) {
        Some(token) => token,
        None if cli.dry_run => String::new(),
        None => anyhow::bail!("GitHub token is required (--token or INPUT_TOKEN)"),
    };

    let timeout_str = non_empty(cli.timeout)
        .or(non_empty(file.timeout))
        .unwrap_or_else(|| DEFAULT_TIMEOUT.to_string());
    let timeout = parse_go_duration(&timeout_str)
        .with_context(|| format!("Invalid timeout {timeout_str:?}"))?;

    Ok(Settings {
        address,
        api_key,
        token,
        timeout,
        pipectl_path: cli
            .pipectl_path
            .or(file.pipectl_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PIPECTL)),
        github_api_url: non_empty(cli.github_api_url)
            .or(non_empty(file.github_api_url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        trigger_command: non_empty(cli.trigger_command)
            .or(non_empty(file.trigger_command))
            .unwrap_or_else(|| DEFAULT_TRIGGER_COMMAND.to_string()),
        dry_run: cli.dry_run,
    })
}

// Actions pass unset inputs as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
