//! Shop-Trawler main entry point
//!
//! This is the command-line interface for the Shop-Trawler product crawler.

use anyhow::{bail, Context};
use clap::Parser;
use shop_trawler::config::{load_config_with_hash, Config};
use shop_trawler::crawler::{TrawlOutcome, Trawler};
use shop_trawler::extract::ExtractionStrategy;
use shop_trawler::fetch::CacheScope;
use shop_trawler::output::{
    print_crawl_stats, print_product_summary, write_agent_output_json, write_products_json,
};
use shop_trawler::url::parse_http_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shop-Trawler: a cache-backed product crawler
///
/// Shop-Trawler crawls an e-commerce site through a remote rendering API,
/// caches the minimized pages, and extracts product records with CSS
/// selector rules (or hands the site to an extraction agent).
#[derive(Parser, Debug)]
#[command(name = "shop-trawler")]
#[command(version)]
#[command(about = "A cache-backed e-commerce product crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed URL to start crawling from
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Write results as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "clear_cache")]
    dry_run: bool,

    /// Clear cached pages (all of them, or both render modes of one URL) and exit
    #[arg(long, value_name = "URL", num_args = 0..=1, default_missing_value = "")]
    clear_cache: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config, cli.url.as_deref());
    }

    if let Some(target) = cli.clear_cache.as_deref() {
        return handle_clear_cache(&config, target);
    }

    let seed = cli
        .url
        .as_deref()
        .context("A seed URL is required (--url)")?;
    handle_trawl(&config, seed, cli.output).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shop_trawler=info,warn"),
            1 => EnvFilter::new("shop_trawler=debug,info"),
            2 => EnvFilter::new("shop_trawler=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would happen
fn handle_dry_run(config: &Config, seed: Option<&str>) -> anyhow::Result<()> {
    println!("=== Shop-Trawler Dry Run ===\n");

    println!("Fetcher:");
    println!("  API URL: {}", config.fetcher.api_url);
    println!(
        "  API key: {}",
        if config.fetcher.api_key.is_some() {
            "configured"
        } else {
            "from ZYTE_API_KEY"
        }
    );
    println!("  Render mode: {}", config.fetcher.render_mode);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nCache:");
    if config.cache.enabled {
        println!("  Database: {}", config.cache.database_path);
        println!("  TTL: {} days", config.cache.ttl_days);
        println!("  Namespace: {}", config.cache.namespace);
    } else {
        println!("  Disabled");
    }

    println!("\nCrawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Link selector: {}", config.crawler.link_selector);

    println!("\nClassification:");
    println!("  URL patterns: {}", config.classification.url_patterns.len());
    println!(
        "  HTML indicators: {}",
        config.classification.html_indicators.len()
    );

    println!("\nExtraction:");
    match config.extraction_strategy() {
        ExtractionStrategy::RuleBased(rules) => {
            println!("  Strategy: rule-based");
            for (label, selector) in rules.all_selectors() {
                println!("    {}: {}", label, selector);
            }
        }
        ExtractionStrategy::AgentBased(template) => {
            println!("  Strategy: agent");
            println!("  Prompt template: {}", template.as_str());
        }
    }

    println!("\n✓ Configuration is valid");
    if let Some(seed) = seed {
        let url = parse_http_url(seed).context("Invalid seed URL")?;
        println!("✓ Would start crawling at {}", url);
    }

    Ok(())
}

/// Handles the --clear-cache mode
fn handle_clear_cache(config: &Config, target: &str) -> anyhow::Result<()> {
    let trawler = Trawler::from_config(config).context("Failed to set up fetcher")?;
    if !trawler.fetcher().cache_enabled() {
        bail!("The page cache is disabled or unavailable");
    }

    let scope = if target.is_empty() {
        CacheScope::All
    } else {
        CacheScope::Url(target.to_string())
    };

    let removed = trawler.fetcher().clear_cache(&scope);
    println!("✓ Removed {} cached pages", removed);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_trawl(config: &Config, seed: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let trawler = Trawler::from_config(config).context("Failed to set up trawler")?;

    match trawler.run(seed).await.context("Run failed")? {
        TrawlOutcome::Products { products, stats } => {
            print_product_summary(&products);
            print_crawl_stats(&stats);

            if let Some(path) = output {
                write_products_json(&path, &products)?;
                println!("\n✓ Products written to: {}", path.display());
            }
        }
        TrawlOutcome::Agent(agent_output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(agent_output.value())?
            );

            if let Some(path) = output {
                write_agent_output_json(&path, &agent_output)?;
                println!("\n✓ Agent output written to: {}", path.display());
            }
        }
    }

    Ok(())
}
