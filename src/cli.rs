//! Command-line interface definitions for Tech Stock News.
//!
//! All global options can be provided via command-line flags, and the two
//! directories also via environment variables.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Tech Stock News scraper.
///
/// # Examples
///
/// ```sh
/// # Collect into the current directory
/// tech_stock_news
///
/// # Collect 30 articles, with body text, into ./out
/// tech_stock_news -o ./out -n 30 collect --with-content
///
/// # Print the body of one article
/// tech_stock_news extract https://www.cnbc.com/2025/05/06/amd-earnings.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the CSV and JSON files
    #[arg(short, long, env = "TSN_OUTPUT_DIR", default_value = ".", global = true)]
    pub output_dir: String,

    /// Directory for raw HTML debug artifacts
    #[arg(long, env = "TSN_DEBUG_DIR", default_value = "debug", global = true)]
    pub debug_dir: String,

    /// Do not save raw HTML debug artifacts
    #[arg(long, global = true)]
    pub no_debug: bool,

    /// Stop collecting once this many articles are gathered (overrides config)
    #[arg(short = 'n', long, global = true)]
    pub target_count: Option<usize>,

    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Seed for source order, user agents and delays
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape all sources, filter, dedupe and save (the default)
    Collect {
        /// Also extract each saved article's body text
        #[arg(long)]
        with_content: bool,
    },
    /// Extract and print the body text of a single article
    Extract {
        /// Article URL
        url: String,
    },
}

impl Cli {
    /// The requested command, defaulting to a plain `collect`.
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Collect { with_content: false })
    }
}
