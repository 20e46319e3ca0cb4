//! Utility functions for text cleanup, file naming, and file system checks.
//!
//! - Whitespace normalization for extracted article text
//! - String truncation and slugification for logging and artifact names
//! - Output directory validation

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}\r\f\v]+").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize whitespace in extracted article text.
///
/// Runs of spaces and tabs collapse to one space, every line is trimmed,
/// and more than one blank line in a row collapses to a single blank line.
/// Paragraph breaks (`\n\n`) survive.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_article_text("  a \t b\n\n\n\nc  "), "a b\n\nc");
/// ```
pub fn clean_article_text(text: &str) -> String {
    let collapsed = INLINE_WS.replace_all(text, " ");
    let trimmed_lines = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUNS
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

/// Collapse all whitespace, including newlines, into single spaces.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and byte count
/// indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Convert text to a file-name-friendly slug.
///
/// Lowercases, drops anything that is not alphanumeric, space, `-` or `_`,
/// and turns spaces into hyphens.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-' && c != '_', "")
        .replace(' ', "-")
}

/// Slug for the last path segment of an article URL.
///
/// `https://www.cnbc.com/2025/05/06/nvidia%20earnings.html` becomes
/// `nvidia-earningshtml`. Falls back to `index` when the path is empty.
pub fn url_slug(link: &str) -> String {
    let segment = url::Url::parse(link)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.rfind(|s| !s.is_empty()).map(str::to_string))
        })
        .unwrap_or_default();
    let decoded = urlencoding::decode(&segment)
        .map(|s| s.into_owned())
        .unwrap_or(segment);
    let slug = slugify(&decoded);
    if slug.is_empty() { "index".to_string() } else { slug }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
