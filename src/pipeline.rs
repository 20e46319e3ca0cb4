//! Keyword filtering and headline deduplication of collected records.

use crate::models::ArticleRecord;
use itertools::Itertools;
use tracing::{info, instrument};

/// Keep records whose headline or summary mentions any keyword.
///
/// Matching is a case-insensitive substring test against each field on its
/// own, so `ai` also hits "retail". That looseness is accepted.
pub fn filter_tech_articles(records: Vec<ArticleRecord>, keywords: &[String]) -> Vec<ArticleRecord> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    records
        .into_iter()
        .filter(|record| {
            let headline = record.headline.to_lowercase();
            let summary = record.summary.to_lowercase();
            keywords
                .iter()
                .any(|k| headline.contains(k.as_str()) || summary.contains(k.as_str()))
        })
        .collect()
}

/// Drop records whose headline was already seen. First occurrence wins.
pub fn dedupe_headlines(records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    records
        .into_iter()
        .unique_by(|record| record.headline.clone())
        .collect()
}

/// Filter then dedupe, logging how many records each step removed.
#[instrument(level = "info", skip_all, fields(collected = records.len()))]
pub fn finalize(records: Vec<ArticleRecord>, keywords: &[String]) -> Vec<ArticleRecord> {
    let collected = records.len();
    let filtered = filter_tech_articles(records, keywords);
    info!(kept = filtered.len(), dropped = collected - filtered.len(), "Keyword filter applied");

    let before = filtered.len();
    let unique = dedupe_headlines(filtered);
    info!(kept = unique.len(), duplicates = before - unique.len(), "Deduplicated headlines");
    unique
}
