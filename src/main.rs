//! # Tech Stock News
//!
//! Scrapes the listing pages of five finance news sites, keeps the headlines
//! that look like tech-stock news, and saves them as CSV and JSON.
//!
//! ## Sources
//!
//! Yahoo Finance, CNBC, Bloomberg, MarketWatch and Investing.com. Each is
//! visited once per run, in random order, with a pause in between.
//!
//! ## Usage
//!
//! ```sh
//! tech_stock_news -o ./out collect --with-content
//! tech_stock_news extract https://finance.yahoo.com/news/some-story.html
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch each site's listing page and pull article records
//! 2. **Aggregation**: stop visiting sites once the target count is reached
//! 3. **Finalizing**: keyword filter, then headline dedupe
//! 4. **Output**: CSV and JSON tables, plus article bodies on request

use chrono::Local;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod artifacts;
mod cli;
mod config;
mod content;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use aggregator::Aggregator;
use artifacts::DebugArtifacts;
use cli::{Cli, Command};
use config::PipelineConfig;
use content::extract_content;
use fetcher::{Fetcher, RetryPolicy};
use models::ArticleBody;
use scrapers::ScrapeContext;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("tech_stock_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path).await.inspect_err(|e| {
            error!(path = %path, error = %e, "Could not load configuration");
        })?,
        None => PipelineConfig::default(),
    };
    if let Some(target) = args.target_count {
        config.target_count = target;
    }
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => {
            info!(seed, "Using fixed random seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let fetcher = Fetcher::new(RetryPolicy::from_config(&config), StdRng::from_rng(&mut rng))?;
    let artifacts = if args.no_debug {
        DebugArtifacts::disabled()
    } else {
        DebugArtifacts::new(&args.debug_dir)
    };
    let debug_dir = artifacts.dir();
    info!(policy = ?fetcher.policy(), ?debug_dir, "HTTP client ready");
    let ctx = ScrapeContext {
        fetcher,
        debug: artifacts,
    };

    match args.command_or_default() {
        Command::Collect { with_content } => {
            run_collect(&ctx, &config, rng, &args.output_dir, with_content).await?;
        }
        Command::Extract { url } => {
            let content = extract_content(&ctx, &url).await;
            println!("{content}");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Scrape, finalize and persist; optionally extract every saved article.
#[instrument(level = "info", skip(ctx, config, rng))]
async fn run_collect(
    ctx: &ScrapeContext,
    config: &PipelineConfig,
    rng: StdRng,
    output_dir: &str,
    with_content: bool,
) -> Result<(), Box<dyn Error>> {
    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let mut aggregator = Aggregator::new(
        scrapers::default_sources(),
        config.target_count,
        config.source_delay,
        rng,
    );
    let collected = aggregator.collect(ctx).await;
    let records = pipeline::finalize(collected, &config.keywords);

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let dir = Path::new(output_dir);
    let Some(files) = outputs::persist(&records, dir, &stamp).await? else {
        return Ok(());
    };
    info!(
        count = records.len(),
        csv = %files.csv.display(),
        json = %files.json.display(),
        "Saved tech stock news"
    );

    if with_content {
        let mut bodies = Vec::with_capacity(records.len());
        let mut extracted = 0;
        for (index, record) in records.iter().enumerate() {
            info!(index, total = records.len(), headline = %record.headline, "Extracting article");
            let content = extract_content(ctx, &record.link).await;
            if content.is_text() {
                extracted += 1;
            }
            bodies.push(ArticleBody::new(record, &content));
        }
        let path = outputs::write_contents(&bodies, dir, &stamp).await?;
        info!(path = %path.display(), extracted, total = bodies.len(), "Saved article contents");
    }

    Ok(())
}
