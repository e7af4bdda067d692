//! Doc-Harvest main entry point
//!
//! This is the command-line interface for the Doc-Harvest document crawler.

use anyhow::{Context, Result};
use clap::Parser;
use doc_harvest::config::{parse_config, validate, Config};
use doc_harvest::crawler::Coordinator;
use doc_harvest::OutputFormat;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Doc-Harvest: turns a website into AI-ready documents
///
/// Doc-Harvest crawls a single site breadth-first from a seed URL, strips
/// boilerplate from every page, enriches the remaining text with metadata
/// and a content type, and writes one document per page.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a site into metadata-enriched documents", long_about = None)]
struct Cli {
    /// Seed URL; also restricts the crawl to its domain
    #[arg(long, value_name = "URL", required_unless_present = "config")]
    start_url: Option<String>,

    /// Output file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<u32>,

    /// Maximum link depth from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seconds to wait between requests
    #[arg(long)]
    delay: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// User-Agent header value, replacing the default
    #[arg(long)]
    user_agent: Option<String>,

    /// Ignore robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Skip pages whose extracted body is shorter than this many characters
    #[arg(long, value_name = "CHARS")]
    min_body_chars: Option<usize>,

    /// TOML configuration file; command-line flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show it without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
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

/// Layers command-line flags over the configuration file (if any)
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => {
            let start_url = cli
                .start_url
                .clone()
                .context("--start-url is required without --config")?;
            Config::for_start_url(start_url)
        }
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout = timeout;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent.override_value = Some(user_agent.clone());
    }
    if cli.no_robots {
        config.crawler.respect_robots = false;
    }
    if let Some(min_body_chars) = cli.min_body_chars {
        config.crawler.min_body_chars = min_body_chars;
    }
    if cli.verbose > 0 {
        config.verbose = true;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Doc-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {}s", config.crawler.delay);
    println!("  Timeout: {}s", config.crawler.timeout);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);
    if config.crawler.min_body_chars > 0 {
        println!("  Min body chars: {}", config.crawler.min_body_chars);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Format: {}", config.output.format);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> Result<()> {
    let output_path = config.output.path.clone();
    let coordinator = Coordinator::new(config).context("Failed to start crawl")?;

    // Ctrl-C stops the crawl before the next page; the output is still closed
    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let stats = coordinator.run().await.context("Crawl failed")?;

    if stats.documents_written == 0 {
        tracing::warn!("Crawl finished without writing any documents to {}", output_path);
    } else {
        tracing::info!("Wrote {} documents to {}", stats.documents_written, output_path);
    }

    if !quiet {
        println!();
        stats.print_summary();
    }

    Ok(())
}
