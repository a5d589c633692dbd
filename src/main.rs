//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape image crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_scrape::config::{load_config_with_hash, Config};
use sumi_scrape::crawler::run_scrape;
use sumi_scrape::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Sumi-Scrape: a depth-bounded image crawler
///
/// Crawls web pages starting from URL, follows links up to DEPTH hops, and saves
/// every image found into one folder per page. A results.json file listing the
/// source page, image URL and depth of every saved image is written at the end.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded image crawler", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Number of link hops to follow (0 = only the seed page)
    #[arg(value_name = "DEPTH")]
    depth: i64,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the results file (overrides the configuration)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Directory in which per-page folders are created (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    download_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    check_args(&cli)?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = cli.output {
        config.output.results_path = output;
    }
    if let Some(download_dir) = cli.download_dir {
        config.output.download_dir = download_dir;
    }

    let report = run_scrape(config, &cli.url, cli.depth)
        .await
        .with_context(|| format!("Crawl from {} failed", cli.url))?;

    tracing::info!(
        "Saved {} results to {}",
        report.records.len(),
        report.results_path.display()
    );

    if !cli.quiet {
        print_statistics(&report.statistics);
    }

    Ok(())
}

/// Checks what clap cannot validate, before any network activity
fn check_args(cli: &Cli) -> anyhow::Result<()> {
    if cli.depth < 0 {
        anyhow::bail!("Depth must be a non-negative integer, got {}", cli.depth);
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scrape=info,warn"),
            1 => EnvFilter::new("sumi_scrape=debug,info"),
            2 => EnvFilter::new("sumi_scrape=trace,debug"),
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
