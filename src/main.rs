//! Linkrot main entry point
//!
//! This is the command-line interface for the Linkrot broken link finder.

use anyhow::Context;
use clap::Parser;
use linkrot::config::{load_config_with_hash, validate, Config};
use linkrot::report::{write_report, ReportFormat, ReportOptions};
use linkrot::{Finder, SortMode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Linkrot: find broken links on a page or a whole site
///
/// Every link is fetched once. Links that fail are re-checked after a short
/// pause before being reported.
#[derive(Parser, Debug)]
#[command(name = "linkrot")]
#[command(version)]
#[command(about = "Find broken links on a page or a whole site", long_about = None)]
struct Cli {
    /// URL of the page (or site root) to check
    #[arg(value_name = "URL")]
    url: String,

    /// Crawl every page of the site instead of a single page
    #[arg(short, long)]
    recursive: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Group report entries by page or by link
    #[arg(short, long, value_enum)]
    sort: Option<SortMode>,

    /// Maximum number of pages classified at once
    #[arg(short, long, value_name = "N")]
    threads: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Only list the first few values of each broken link group
    #[arg(long)]
    concise: bool,

    /// List every value of each ignored link group
    #[arg(long)]
    show_ignored: bool,

    /// Only crawl site pages whose path matches one of these globs
    #[arg(long, value_delimiter = ',', value_name = "GLOBS")]
    allow_paths: Vec<String>,

    /// Skip site pages whose path matches one of these globs
    #[arg(long, value_delimiter = ',', value_name = "GLOBS")]
    disallow_paths: Vec<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
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
            0 => EnvFilter::new("linkrot=warn"),
            1 => EnvFilter::new("linkrot=info,warn"),
            2 => EnvFilter::new("linkrot=debug,info"),
            _ => EnvFilter::new("linkrot=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the crawl; returns whether broken links were found
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let mut finder = Finder::from_config(&config)?;
    let has_broken = if cli.recursive {
        finder.crawl_site(&cli.url).await?
    } else {
        finder.crawl_page(&cli.url).await?
    };

    write_report(
        &finder.report(),
        config.report.format,
        &ReportOptions::from(&config.report),
        cli.output.as_deref(),
    )
    .context("Failed to write report")?;

    Ok(has_broken)
}

/// Command line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(sort) = cli.sort {
        config.finder.sort = sort;
    }
    if let Some(threads) = cli.threads {
        config.finder.max_workers = threads;
    }
    if let Some(format) = cli.format {
        config.report.format = format;
    }
    if cli.concise {
        config.report.broken_verbose = false;
    }
    if cli.show_ignored {
        config.report.ignored_verbose = true;
    }
    if !cli.allow_paths.is_empty() {
        config.crawler.allow_paths = cli.allow_paths.clone();
    }
    if !cli.disallow_paths.is_empty() {
        config.crawler.disallow_paths = cli.disallow_paths.clone();
    }
}
