//! Availability Crawler main entry point
//!
//! This is the command-line interface for the availability crawler.

use anyhow::Context;
use availability_crawler::config::{load_config_with_hash, validate, Config};
use availability_crawler::output::{
    aggregate_by_day, print_plot, print_statistics, write_csv, AvailabilityStatistics,
};
use availability_crawler::{CrawlError, Crawler};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Availability Crawler: rental availability dates over time
///
/// Walks every page of a rental search, reads each listing's
/// "available from" date and exports the dates as CSV or a plot.
#[derive(Parser, Debug)]
#[command(name = "availability-crawler")]
#[command(version)]
#[command(about = "Collects rental availability dates from paginated search results", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in search when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// What to do with the collected dates
    #[arg(long, value_enum, default_value_t = ExportMode::Csv)]
    export: ExportMode,

    /// Stop after this many result pages
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportMode {
    /// Write one DD/MM/YYYY line per listing to the output file
    Csv,
    /// Print a count-per-day scatter plot
    Plot,
    /// Write the CSV and print the plot
    Both,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_from_file(path)?,
        None => {
            tracing::info!("No configuration file given, using built-in search");
            Config::default()
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, cli.export);
        return Ok(());
    }

    let dates = handle_crawl(&config).await?;
    handle_export(&config, &dates, cli.export)?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("availability_crawler=info,warn"),
            1 => EnvFilter::new("availability_crawler=debug,info"),
            2 => EnvFilter::new("availability_crawler=trace,debug"),
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

fn load_from_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, export: ExportMode) {
    println!("=== Availability Crawler Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Search path: {}", config.site.search_path);

    println!("\nCrawler:");
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact) = &config.user_agent.contact {
        println!("  Contact: {}", contact);
    }

    println!("\nOutput:");
    println!("  Export: {:?}", export);
    println!("  CSV: {}", config.output.output_path);

    println!("\n✓ Configuration is valid");
}

/// Runs the crawl and returns the collected dates
async fn handle_crawl(config: &Config) -> anyhow::Result<Vec<NaiveDate>> {
    let mut crawler = Crawler::new(config)?;

    let summary = match crawler.crawl(&config.site.search_path).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if summary.final_state.is_success() {
        tracing::info!(
            "Collected {} availability dates from {} pages",
            summary.dates_collected,
            summary.pages_visited
        );
    } else if summary.final_state.is_truncated() {
        tracing::warn!(
            "Crawl stopped early ({}): {} availability dates from {} pages",
            summary.final_state,
            summary.dates_collected,
            summary.pages_visited
        );
    }

    Ok(crawler.into_availabilities())
}

/// Exports the dates according to the chosen mode
fn handle_export(
    config: &Config,
    dates: &[NaiveDate],
    export: ExportMode,
) -> Result<(), CrawlError> {
    print_statistics(&AvailabilityStatistics::from_dates(dates));

    if matches!(export, ExportMode::Csv | ExportMode::Both) {
        let path = Path::new(&config.output.output_path);
        if let Err(e) = write_csv(dates, path) {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            return Err(e.into());
        }
        println!("✓ Dates exported to: {}", path.display());
    }

    if matches!(export, ExportMode::Plot | ExportMode::Both) {
        print_plot(&aggregate_by_day(dates));
    }

    Ok(())
}
