mod aggregate;
mod cli;
mod collector;
mod config;
mod error;
mod extract;
mod github;
mod report;
mod types;

use crate::error::CollectorError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const RATE_LIMITED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Text => report::OutputFormat::Text,
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

/// Picks the first non-empty token: CLI flag, then environment, then config.
fn resolve_token(
    flag: Option<String>,
    env: Option<String>,
    config: Option<&str>,
) -> Option<String> {
    let present = |token: &String| !token.is_empty();
    flag.filter(present)
        .or_else(|| env.filter(present))
        .or_else(|| config.filter(|token| !token.is_empty()).map(str::to_string))
}

fn run(cli: cli::Cli) -> Result<i32, CollectorError> {
    match cli.command {
        cli::Commands::Collect(cmd) => {
            let loaded = config::load_config(&std::env::current_dir()?)?;

            let token = resolve_token(
                cmd.token,
                std::env::var("GITHUB_TOKEN").ok(),
                loaded.token(),
            );
            let api_url = cmd
                .api_url
                .unwrap_or_else(|| loaded.api_url().to_string());
            let days = cmd.days.unwrap_or_else(|| loaded.days());
            let output = cmd
                .output
                .unwrap_or_else(|| PathBuf::from(loaded.output()));

            let client = github::GithubClient::new(
                &api_url,
                token,
                Duration::from_secs(loaded.timeout_secs()),
                &loaded.user_agent(),
            );
            if !client.is_authenticated() {
                tracing::warn!("no GitHub token configured; unauthenticated rate limits apply");
            }

            let artifact = collector::collect_organization(&client, &cmd.organization, days)?;
            collector::save_artifact(&output, &artifact)?;
            println!("Data saved to {}", output.display());

            println!("Collected metrics for {}:", cmd.organization);
            let rendered = report::render(&artifact.metrics, output_format(cmd.format))?;
            println!("{}", rendered.trim_end());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Summarize(cmd) => {
            let artifact = collector::load_artifact(&cmd.path)?;
            let org = &artifact.raw_data.organization;
            let days = cmd.days.unwrap_or(org.lookback_days);
            let metrics = aggregate::aggregate(&org.repos, days);

            println!("Metrics for {} ({} day window):", org.name, days);
            let rendered = report::render(&metrics, output_format(cmd.format))?;
            println!("{}", rendered.trim_end());
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                CollectorError::RateLimited { .. } => exit_code::RATE_LIMITED,
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
