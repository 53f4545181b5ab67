//! Command-line interface for plan-preview-action
//!
//! Provides the `run` subcommand used inside a workflow and a `render`
//! subcommand for looking at a pipectl result file locally.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod render;
mod run;

/// Run pipectl plan-preview for a pull request and comment the result
#[derive(Parser)]
#[command(name = "plan-preview-action")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the triggering pull request and post the result as a comment
    Run(Box<run::RunArgs>),

    /// Render a pipectl plan-preview result file as comment text
    Render(render::RenderArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, is used as is; otherwise --verbose picks DEBUG over INFO.
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::default().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::default().add_directive(Level::INFO.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Run(args) => run::run(*args),
        Commands::Render(args) => render::run(args),
    }
}
