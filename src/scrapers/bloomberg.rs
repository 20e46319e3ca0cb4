//! Bloomberg.
//!
//! Stories sit in `story-package` blocks on section pages and in plain
//! `article` elements elsewhere. Most article pages are paywalled; the fence
//! markup is detected before any text is pulled.

use super::{ContainerStrategy, SiteProfile};
use crate::content::{BodyProfile, STANDARD_STRIP};

pub const LISTING: SiteProfile = SiteProfile {
    name: "Bloomberg",
    artifact: "bloomberg",
    base_url: "https://www.bloomberg.com",
    primary_url: "https://www.bloomberg.com/technology",
    fallback_url: "https://www.bloomberg.com/markets",
    containers: &[
        ContainerStrategy::new("div.story-package article"),
        ContainerStrategy::new("div.story-package div.story-list-story"),
        ContainerStrategy::new("article"),
        ContainerStrategy::new("div.story-list-story, div.storyItem"),
    ],
    headline: &["h3", "h2", "h1"],
    blocklist: &["advertisement", "sponsored", "promoted"],
    container_link_fallback: false,
    summary: &["p"],
    date: &["time"],
    date_separator: None,
};

pub const ARTICLE: BodyProfile = BodyProfile {
    site: "Bloomberg",
    artifact: "bloomberg_article",
    domain: "bloomberg.com",
    strip: STANDARD_STRIP,
    paywall: &["div.paywall, div.fence-body"],
    containers: &[
        "div.body-copy, div.body-copy-v2, div.body-content",
        "div.story-body-container",
    ],
    paragraph_groups: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_article;
    use crate::models::ArticleContent;
    use crate::scrapers::parse_listing;

    #[test]
    fn test_story_package() {
        let html = r#"
            <div class="story-package">
              <article>
                <h3><a href="/news/articles/2025-05-06/tsmc-sales">TSMC sales jump on AI demand</a></h3>
                <p>April revenue rose 48%.</p>
                <time datetime="2025-05-06">May 6, 2025</time>
              </article>
              <article><h3>No link for this one</h3></article>
            </div>
            <article><h3><a href="/other">Outside the package</a></h3></article>
        "#;
        let records = parse_listing(html, &LISTING).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].link,
            "https://www.bloomberg.com/news/articles/2025-05-06/tsmc-sales"
        );
        assert_eq!(records[0].published_date, "May 6, 2025");
        assert_eq!(records[0].summary, "April revenue rose 48%.");
    }

    #[test]
    fn test_story_items_fallback() {
        let html = r#"<div class="storyItem"><a href="/news/x"><h2>Broadcom guidance lifts chip stocks</h2></a></div>"#;
        let records = parse_listing(html, &LISTING).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "https://www.bloomberg.com/news/x");
    }

    #[test]
    fn test_paywall_short_circuits() {
        let html = r#"
            <div class="fence-body"><p>Subscribe to keep reading</p></div>
            <div class="body-copy"><p>Hidden text</p></div>
        "#;
        assert_eq!(
            parse_article(html, &ARTICLE).unwrap(),
            ArticleContent::Paywalled { site: "Bloomberg" }
        );
    }

    #[test]
    fn test_article_body() {
        let html = r#"<div class="body-copy-v2"><p>Oracle shares fell.</p><p>Cloud bookings slowed.</p></div>"#;
        assert_eq!(
            parse_article(html, &ARTICLE).unwrap(),
            ArticleContent::Text("Oracle shares fell.\n\nCloud bookings slowed.".into())
        );
    }
}
