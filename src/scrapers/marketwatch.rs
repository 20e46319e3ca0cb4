//! MarketWatch.

use super::{ContainerStrategy, SiteProfile};
use crate::content::{BodyProfile, STANDARD_STRIP};

pub const LISTING: SiteProfile = SiteProfile {
    name: "MarketWatch",
    artifact: "marketwatch",
    base_url: "https://www.marketwatch.com",
    primary_url: "https://www.marketwatch.com/investing/technology",
    fallback_url: "https://www.marketwatch.com/latest-news",
    containers: &[
        ContainerStrategy::new("div.article__content"),
        ContainerStrategy::new("div.story, div.story__body"),
    ],
    headline: &["h3.article__headline", "h2", "h3"],
    blocklist: &["advertisement", "sponsored content", "press release"],
    container_link_fallback: false,
    summary: &["p.article__summary", "p"],
    date: &["div.article__details"],
    date_separator: None,
};

pub const ARTICLE: BodyProfile = BodyProfile {
    site: "MarketWatch",
    artifact: "marketwatch_article",
    domain: "marketwatch.com",
    strip: STANDARD_STRIP,
    paywall: &[],
    containers: &["div#js-article__body", "div.article__body", "div.article-body"],
    paragraph_groups: None,
};
