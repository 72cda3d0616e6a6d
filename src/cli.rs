use crate::types::artifact::MAX_LOOKBACK_DAYS;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "orgpulse",
    version,
    about = "GitHub organization activity and ecosystem-health metrics collector"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect activity for every public repository of an organization
    Collect(CollectCommand),
    /// Recompute metrics from a previously saved artifact
    Summarize(SummarizeCommand),
}

#[derive(Args)]
pub struct CollectCommand {
    /// GitHub organization name
    pub organization: String,

    /// GitHub API token (falls back to GITHUB_TOKEN, then config)
    #[arg(long)]
    pub token: Option<String>,

    /// Days back to analyze
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_LOOKBACK_DAYS))
    )]
    pub days: Option<u32>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct SummarizeCommand {
    /// Artifact written by `collect`
    pub path: PathBuf,

    /// Override the lookback window stored in the artifact
    #[arg(long)]
    pub days: Option<u32>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Md,
}
