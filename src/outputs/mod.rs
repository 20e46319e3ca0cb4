//! Persisting the final record table.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── tech_stock_news_20250506_143000.csv
//! ├── tech_stock_news_20250506_143000.json
//! └── tech_stock_news_20250506_143000_content.json   # collect --with-content
//! ```

pub mod csv;
pub mod json;

use crate::error::Result;
use crate::models::{ArticleBody, ArticleRecord};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const FILE_PREFIX: &str = "tech_stock_news";

/// Paths of the files written by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

impl OutputFiles {
    pub fn new(dir: &Path, stamp: &str) -> Self {
        Self {
            csv: dir.join(format!("{FILE_PREFIX}_{stamp}.csv")),
            json: dir.join(format!("{FILE_PREFIX}_{stamp}.json")),
        }
    }

    pub fn content(dir: &Path, stamp: &str) -> PathBuf {
        dir.join(format!("{FILE_PREFIX}_{stamp}_content.json"))
    }
}

/// Write the CSV and JSON tables. An empty table writes nothing.
#[instrument(level = "info", skip(records), fields(count = records.len()))]
pub async fn persist(records: &[ArticleRecord], dir: &Path, stamp: &str) -> Result<Option<OutputFiles>> {
    if records.is_empty() {
        warn!("No articles found; nothing written");
        return Ok(None);
    }

    let files = OutputFiles::new(dir, stamp);
    self::csv::write_csv(records, &files.csv).await?;
    json::write_json(records, &files.json).await?;
    info!(csv = %files.csv.display(), json = %files.json.display(), "Saved articles");
    Ok(Some(files))
}

/// Write extracted article bodies next to the tables.
pub async fn write_contents(bodies: &[ArticleBody], dir: &Path, stamp: &str) -> Result<PathBuf> {
    let path = OutputFiles::content(dir, stamp);
    json::write_json(bodies, &path).await?;
    Ok(path)
}
