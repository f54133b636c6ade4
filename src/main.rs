//! Trawler main entry point
//!
//! This is the command-line interface for the Trawler web crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use trawler::config::{load_config_with_hash, Config};
use trawler::output::{print_statistics, LinkFileSink};
use trawler::{CrawlHandlers, Crawler};
use tracing_subscriber::EnvFilter;

/// Trawler: a polite, selector-driven web crawler
///
/// Trawler starts at a base URL, follows links matched by the configured
/// selectors and reports content matches, pacing its requests and staying
/// within the base site when asked to.
#[derive(Parser, Debug)]
#[command(name = "trawler")]
#[command(version)]
#[command(about = "A polite, selector-driven web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "trawler=info,warn",
            1 => "trawler=debug,info",
            2 => "trawler=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn print_dry_run(config: &Config) {
    println!("=== Trawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Time between requests: {}ms",
        config.crawler.time_between_requests
    );
    println!("  Ignore external: {}", config.crawler.ignore_external);
    println!("  Stop when idle: {}", config.crawler.stop_when_idle);

    println!("\nLink Selectors ({}):", config.selectors.links.len());
    for selector in &config.selectors.links {
        println!("  - {}", selector);
    }

    println!("\nContent Selectors ({}):", config.selectors.content.len());
    for selector in &config.selectors.content {
        println!("  - {}", selector);
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    if let Some(path) = &config.output.links_path {
        println!("\nLinks file: {}", path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Runs until Ctrl-C (or, with stop-when-idle, until the frontier drains),
/// then waits for in-flight visits and prints statistics.
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let mut handlers = CrawlHandlers::new().on_content(|url, matches| {
        for selector_match in matches {
            for element in &selector_match.elements {
                tracing::info!("{} [{}]: {}", url, selector_match.selector, element.text);
            }
        }
    });

    if let Some(path) = &config.output.links_path {
        let sink =
            LinkFileSink::open(path).with_context(|| format!("opening links file {}", path))?;
        tracing::info!("Appending discovered links to {}", sink.path().display());
        handlers = handlers.on_admitted(move |urls| sink.record_or_warn(urls));
    }

    let crawler = Crawler::new(config, handlers).context("creating crawler")?;
    crawler.start();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("listening for Ctrl-C")?;
            tracing::info!("Interrupted, pausing crawler");
            crawler.pause();
        }
        _ = crawler.stopped() => {}
    }

    crawler.drained().await;
    tracing::info!(
        "Crawl stopped after {} visits ({} still queued)",
        crawler.visited_count(),
        crawler.frontier_len()
    );
    print_statistics(&crawler.stats());

    Ok(())
}
