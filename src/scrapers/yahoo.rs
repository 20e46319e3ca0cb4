//! Yahoo Finance.
//!
//! The tech topic page has shipped at least three layouts: atomic-CSS stream
//! items (`Ov(h)`), `js-stream-content` list items, and bare `h3` headlines
//! whose grandparent wraps the story. Meta lines read `Publisher · 2h ago`.

use super::{ContainerStrategy, SiteProfile};
use crate::content::{BodyProfile, STANDARD_STRIP};

pub const LISTING: SiteProfile = SiteProfile {
    name: "Yahoo Finance",
    artifact: "yahoo_finance",
    base_url: "https://finance.yahoo.com",
    primary_url: "https://finance.yahoo.com/topic/tech/",
    fallback_url: "https://finance.yahoo.com/news/",
    containers: &[
        ContainerStrategy::new(r#"div[class~="Ov(h)"]"#),
        ContainerStrategy::new("li.js-stream-content"),
        ContainerStrategy::climbing("h3", 2),
    ],
    headline: &["h3", "h2"],
    blocklist: &["advertisement", "sponsor", "promoted"],
    container_link_fallback: false,
    summary: &["p"],
    date: &[r#"span[class~="C(#959595)"]"#, r#"div[class~="C(#959595)"]"#],
    date_separator: Some('·'),
};

pub const ARTICLE: BodyProfile = BodyProfile {
    site: "Yahoo Finance",
    artifact: "yahoo_article",
    domain: "yahoo.com",
    strip: STANDARD_STRIP,
    paywall: &[],
    containers: &["div.caas-body", "div.canvas-body, div.article-body"],
    paragraph_groups: None,
};
