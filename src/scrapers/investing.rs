//! Investing.com.
//!
//! List view has no teaser text; the headline anchor is also the link.

use super::{ContainerStrategy, SiteProfile};
use crate::content::{BodyProfile, STANDARD_STRIP};

pub const LISTING: SiteProfile = SiteProfile {
    name: "Investing.com",
    artifact: "investing_com",
    base_url: "https://www.investing.com",
    primary_url: "https://www.investing.com/news/technology",
    fallback_url: "https://www.investing.com/news/stock-market-news",
    containers: &[
        ContainerStrategy::new("div.largeTitle"),
        ContainerStrategy::new("article.js-article-item"),
    ],
    headline: &["a.title", "a"],
    blocklist: &["advertisement", "sponsored"],
    container_link_fallback: false,
    summary: &[],
    date: &["span.date", "time"],
    date_separator: None,
};

pub const ARTICLE: BodyProfile = BodyProfile {
    site: "Investing.com",
    artifact: "investing_article",
    domain: "investing.com",
    strip: STANDARD_STRIP,
    paywall: &[],
    containers: &["div.WYSIWYG.articlePage", "div.articlePage", "div#article"],
    paragraph_groups: None,
};
