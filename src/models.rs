//! Data models for scraped headlines and extracted article bodies.
//!
//! - [`ArticleRecord`]: one headline found on a listing page
//! - [`ArticleContent`]: the outcome of pulling the body text of one article
//! - [`ArticleBody`]: an [`ArticleContent`] flattened for the content JSON file

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category stamped on every record.
pub const CATEGORY: &str = "tech stocks";

/// Placeholder used when a listing shows no date for an article.
pub const UNKNOWN_DATE: &str = "Unknown";

/// A news headline scraped from a listing page.
///
/// Records are built once by a site extractor and never mutated afterwards.
/// `headline` and `link` are always non-empty; `link` is absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub headline: String,
    /// Teaser text; empty for sites whose listings carry none.
    pub summary: String,
    pub link: String,
    /// Site-native date text, never parsed.
    pub published_date: String,
    pub source: String,
    /// Local time of extraction, `YYYY-MM-DD HH:MM:SS`.
    pub scraped_date: String,
    pub category: String,
}

impl ArticleRecord {
    /// Build a record stamped with the current local time.
    pub fn new(
        headline: impl Into<String>,
        summary: impl Into<String>,
        link: impl Into<String>,
        published_date: Option<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            summary: summary.into(),
            link: link.into(),
            published_date: published_date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            source: source.into(),
            scraped_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            category: CATEGORY.to_string(),
        }
    }
}

/// Result of extracting the body of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleContent {
    /// Cleaned paragraph text.
    Text(String),
    Paywalled { site: &'static str },
    ContainerNotFound { site: &'static str },
    /// The page could not be fetched. `maybe_paywalled` is set for sites
    /// known to refuse paywalled pages outright.
    FetchFailed {
        site: &'static str,
        maybe_paywalled: bool,
    },
    InvalidUrl,
}

impl ArticleContent {
    pub fn is_text(&self) -> bool {
        matches!(self, ArticleContent::Text(_))
    }

    /// Short machine-friendly label.
    pub fn status(&self) -> &'static str {
        match self {
            ArticleContent::Text(_) => "ok",
            ArticleContent::Paywalled { .. } => "paywalled",
            ArticleContent::ContainerNotFound { .. } => "not_found",
            ArticleContent::FetchFailed { .. } => "fetch_failed",
            ArticleContent::InvalidUrl => "invalid_url",
        }
    }
}

impl fmt::Display for ArticleContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleContent::Text(text) => f.write_str(text),
            ArticleContent::Paywalled { site } => write!(f, "This {site} article is behind a paywall"),
            ArticleContent::ContainerNotFound { site } => {
                write!(f, "Could not find article content on {site}")
            }
            ArticleContent::FetchFailed {
                site,
                maybe_paywalled,
            } => {
                write!(f, "Failed to fetch {site} article")?;
                if *maybe_paywalled {
                    f.write_str(" - may be paywalled")?;
                }
                Ok(())
            }
            ArticleContent::InvalidUrl => f.write_str("No valid URL provided"),
        }
    }
}

/// One entry of `tech_stock_news_<ts>_content.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleBody {
    pub headline: String,
    pub link: String,
    pub status: String,
    /// Article text, or the failure message when `status != "ok"`.
    pub content: String,
}

impl ArticleBody {
    pub fn new(record: &ArticleRecord, content: &ArticleContent) -> Self {
        Self {
            headline: record.headline.clone(),
            link: record.link.clone(),
            status: content.status().to_string(),
            content: content.to_string(),
        }
    }
}
