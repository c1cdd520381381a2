//! GSC-Reindex main entry point
//!
//! This is the command-line interface for the GSC-Reindex tool.

use anyhow::Context;
use clap::Parser;
use gsc_reindex::config::{
    build_run_config, load_settings_or_default, SettingsOverrides, DEFAULT_CREDENTIALS_PATH,
};
use gsc_reindex::engine::{run, Services};
use gsc_reindex::gsc::{build_http_client, GscClient, ServiceAccountTokenProvider};
use gsc_reindex::output::ConsoleOutput;
use gsc_reindex::{ConfigError, ReindexError, RunConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// GSC-Reindex: request indexing for pages Google has not indexed yet
///
/// Checks every page of a Search Console property against its indexing
/// status, caches what it saw, and submits indexing requests for the pages
/// that are not indexed.
#[derive(Parser, Debug)]
#[command(name = "gsc-reindex")]
#[command(version)]
#[command(about = "Request Google indexing for unindexed pages", long_about = None)]
struct Cli {
    /// Domain (example.com), site URL (https://example.com), or path to a CSV of URLs
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Path to the service account JSON key
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Path to an optional TOML settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the per-site status caches
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<String>,

    /// Number of status lookups run concurrently
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Days a cached status stays trustworthy
    #[arg(long, value_name = "DAYS")]
    ttl_days: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_run_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    match handle_run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gsc_reindex=info,warn"),
            1 => EnvFilter::new("gsc_reindex=debug,info"),
            2 => EnvFilter::new("gsc_reindex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the settings file, CLI overrides and positional input
fn load_run_config(cli: &Cli) -> Result<RunConfig, ConfigError> {
    let mut settings = load_settings_or_default(cli.config.as_deref())?;

    SettingsOverrides {
        cache_dir: cli.cache_dir.clone(),
        batch_size: cli.batch_size,
        ttl_days: cli.ttl_days,
    }
    .apply_to(&mut settings);

    build_run_config(cli.input.as_deref(), cli.credentials.clone(), settings)
}

/// Wires the HTTP collaborators and runs the pipeline
async fn handle_run(config: &RunConfig) -> anyhow::Result<()> {
    let api = &config.settings.api;
    let http = build_http_client(api).context("Failed to build HTTP client")?;

    let tokens =
        ServiceAccountTokenProvider::new(&config.credentials, &api.token_endpoint, http.clone());
    let client = GscClient::with_client(http, api.clone());
    let services = Services::from_client(&tokens, &client);

    run(config, &services, &ConsoleOutput).await?;
    Ok(())
}

/// Prints the operator-facing message for a failed run
fn report_failure(error: &anyhow::Error) {
    match error.downcast_ref::<ReindexError>() {
        Some(ReindexError::RateLimited(kind)) => eprintln!("🚦 {}", kind),
        Some(e @ ReindexError::NoSitemaps { .. }) => eprintln!("❌ {}", e),
        Some(ReindexError::Config(e)) => eprintln!("❌ {}", e),
        _ => {
            tracing::error!("Run failed: {:#}", error);
            eprintln!("❌ {:#}", error);
        }
    }
}
