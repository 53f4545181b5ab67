//! Render command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::domain::EventDescriptor;
use crate::planner::load_result;
use crate::render::render_comment;

#[derive(Args)]
pub struct RenderArgs {
    /// Result file written by `pipectl plan-preview --out`
    #[arg(value_name = "RESULT_FILE")]
    pub result: PathBuf,

    /// Head commit the result was planned for
    #[arg(long, value_name = "SHA", default_value = "")]
    pub head_commit: String,

    /// Login to address the comment to
    #[arg(long, value_name = "LOGIN", default_value = "")]
    pub sender: String,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let result = load_result(&args.result)
        .with_context(|| format!("Failed to load {}", args.result.display()))?;
    let event = EventDescriptor {
        head_commit: args.head_commit,
        sender_login: args.sender,
        ..Default::default()
    };
    print!("{}", render_comment(&event, &result));
    Ok(())
}
