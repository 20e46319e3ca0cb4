//! CNBC.
//!
//! Listing cards come in several flavors (`Card-titleContainer`,
//! `Card-standardBreakerCard`, `Card-mediaCard`, `data-test="Card"`). Cards
//! carry no teaser text, and the title element is not always the link, so the
//! first anchor in the card is accepted as the link.

use super::{ContainerStrategy, SiteProfile};
use crate::content::BodyProfile;

pub const LISTING: SiteProfile = SiteProfile {
    name: "CNBC",
    artifact: "cnbc_finance",
    base_url: "https://www.cnbc.com",
    primary_url: "https://www.cnbc.com/technology/",
    fallback_url: "https://www.cnbc.com/investing/",
    containers: &[
        ContainerStrategy::new("div.Card-titleContainer"),
        ContainerStrategy::new("div.Card-standardBreakerCard"),
        ContainerStrategy::new("div.Card-mediaCard"),
        ContainerStrategy::new(r#"div[data-test="Card"]"#),
    ],
    headline: &["a.Card-title", "span.Card-title", "h3.Card-title"],
    blocklist: &["advertisement", "sponsored", "promoted", "paid program"],
    container_link_fallback: true,
    summary: &[],
    date: &["span.Card-time", "time", r#"span[data-test="Card-time"]"#],
    date_separator: None,
};

pub const ARTICLE: BodyProfile = BodyProfile {
    site: "CNBC",
    artifact: "cnbc_article",
    domain: "cnbc.com",
    strip: &["script", "style", "nav", "header", "footer", "aside"],
    paywall: &[],
    containers: &[
        "div.ArticleBody-articleBody",
        "div#article_body",
        "div.Article-articleBody",
    ],
    paragraph_groups: Some("div.group"),
};
