//! Article body extraction.
//!
//! [`extract_content`] picks a [`BodyProfile`] by the article's host, fetches
//! the page, and joins the paragraphs of the main content container. Every
//! outcome, including failures, comes back as an [`ArticleContent`] so callers
//! never confuse an error message with article text.

use crate::error::Result;
use crate::models::ArticleContent;
use crate::scrapers::{ScrapeContext, bloomberg, cnbc, investing, marketwatch, selector, yahoo};
use crate::utils::{clean_article_text, truncate_for_log, url_slug};
use scraper::{ElementRef, Html, Selector};
use std::iter;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Elements whose text never counts as article content.
pub const STANDARD_STRIP: &[&str] = &["script", "style", "nav", "header", "footer"];

/// How to find the article text on one site.
#[derive(Debug)]
pub struct BodyProfile {
    /// Human-readable site name used in failure messages.
    pub site: &'static str,
    /// File stem prefix of the saved article page.
    pub artifact: &'static str,
    /// Hosts containing this string use the profile.
    pub domain: &'static str,
    /// Tag names whose subtrees are ignored.
    pub strip: &'static [&'static str],
    /// Any match means the article is paywalled.
    pub paywall: &'static [&'static str],
    /// Main content container, tried in order.
    pub containers: &'static [&'static str],
    /// When present and matched, only paragraphs inside these blocks are used.
    pub paragraph_groups: Option<&'static str>,
}

/// Fallback for hosts without a dedicated profile.
pub const GENERIC: BodyProfile = BodyProfile {
    site: "website",
    artifact: "generic_article",
    domain: "",
    strip: &["script", "style", "nav", "header", "footer", "aside"],
    paywall: &[],
    containers: &[
        "article",
        "main",
        "div.article-body, div.article-content, div.post-content, div.entry-content",
        "div.content, div#content",
        "body",
    ],
    paragraph_groups: None,
};

/// Site profiles, checked in order against the article host.
pub const SITE_PROFILES: [&BodyProfile; 5] = [
    &yahoo::ARTICLE,
    &cnbc::ARTICLE,
    &marketwatch::ARTICLE,
    &bloomberg::ARTICLE,
    &investing::ARTICLE,
];

/// Profile for an article URL, or [`GENERIC`].
pub fn profile_for(url: &Url) -> &'static BodyProfile {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    SITE_PROFILES
        .iter()
        .copied()
        .find(|profile| host.contains(profile.domain))
        .unwrap_or(&GENERIC)
}

/// True if the element or one of its ancestors is a stripped tag.
fn is_stripped(element: ElementRef<'_>, strip: &[&str]) -> bool {
    iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| strip.iter().any(|tag| *tag == el.value().name()))
}

/// Text of `element`, leaving out anything under a stripped tag.
fn visible_text(element: ElementRef<'_>, strip: &[&str]) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .filter_map(ElementRef::wrap)
                .any(|el| strip.iter().any(|tag| *tag == el.value().name()));
            (!hidden).then_some(&**text)
        })
        .collect()
}

fn find_container<'a>(document: &'a Html, profile: &BodyProfile) -> Result<Option<ElementRef<'a>>> {
    for css in profile.containers {
        let sel = selector(css)?;
        if let Some(found) = document
            .select(&sel)
            .find(|el| !is_stripped(*el, profile.strip))
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn paragraphs<'a>(
    container: ElementRef<'a>,
    groups: Option<&Selector>,
    paragraph: &Selector,
) -> Vec<ElementRef<'a>> {
    if let Some(groups) = groups {
        let blocks: Vec<ElementRef<'a>> = container.select(groups).collect();
        if !blocks.is_empty() {
            return blocks
                .into_iter()
                .flat_map(|block| block.select(paragraph))
                .collect();
        }
    }
    container.select(paragraph).collect()
}

/// Pull the article text out of a fetched page.
///
/// Only a broken selector in the profile is an error.
pub fn parse_article(html: &str, profile: &BodyProfile) -> Result<ArticleContent> {
    let document = Html::parse_document(html);

    for css in profile.paywall {
        if document.select(&selector(css)?).next().is_some() {
            return Ok(ArticleContent::Paywalled { site: profile.site });
        }
    }

    let Some(container) = find_container(&document, profile)? else {
        return Ok(ArticleContent::ContainerNotFound { site: profile.site });
    };

    let paragraph = selector("p")?;
    let groups = profile.paragraph_groups.map(selector).transpose()?;
    let text = paragraphs(container, groups.as_ref(), &paragraph)
        .into_iter()
        .filter(|p| !is_stripped(*p, profile.strip))
        .map(|p| visible_text(p, profile.strip).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(ArticleContent::Text(clean_article_text(&text)))
}

/// Fetch an article and extract its body text.
#[instrument(level = "info", skip(ctx))]
pub async fn extract_content(ctx: &ScrapeContext, url: &str) -> ArticleContent {
    let url = url.trim();
    if !url.starts_with("http") {
        return ArticleContent::InvalidUrl;
    }
    let Ok(parsed) = Url::parse(url) else {
        return ArticleContent::InvalidUrl;
    };

    let profile = profile_for(&parsed);
    info!(site = profile.site, "Extracting article content");

    let page = match ctx.fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            return ArticleContent::FetchFailed {
                site: profile.site,
                maybe_paywalled: !profile.paywall.is_empty(),
            };
        }
    };

    ctx.debug
        .save(&format!("{}_{}", profile.artifact, url_slug(url)), &page.body)
        .await;

    match parse_article(&page.body, profile) {
        Ok(ArticleContent::Text(text)) => {
            info!(
                chars = text.chars().count(),
                preview = %truncate_for_log(&text, 120),
                "Extracted article text"
            );
            ArticleContent::Text(text)
        }
        Ok(other) => {
            warn!(status = other.status(), "{other}");
            other
        }
        Err(e) => {
            error!(error = %e, "Article profile is broken");
            ArticleContent::ContainerNotFound { site: profile.site }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::DebugArtifacts;
    use crate::fetcher::tests::quick_fetcher;
    use mockito::Server;

    fn ctx() -> ScrapeContext {
        ScrapeContext {
            fetcher: quick_fetcher(1),
            debug: DebugArtifacts::disabled(),
        }
    }

    #[test]
    fn test_dispatch_by_domain() {
        let cases = [
            ("https://finance.yahoo.com/news/x.html", "Yahoo Finance"),
            ("https://www.cnbc.com/2025/01/01/x.html", "CNBC"),
            ("https://www.marketwatch.com/story/x", "MarketWatch"),
            ("https://www.bloomberg.com/news/articles/x", "Bloomberg"),
            ("https://www.investing.com/news/x", "Investing.com"),
            ("https://techcrunch.com/2025/x", "website"),
        ];
        for (url, site) in cases {
            assert_eq!(profile_for(&Url::parse(url).unwrap()).site, site, "{url}");
        }
    }

    #[test]
    fn test_every_body_selector_compiles() {
        for profile in SITE_PROFILES.into_iter().chain(iter::once(&GENERIC)) {
            for css in profile.containers.iter().chain(profile.paywall) {
                selector(css).unwrap();
            }
            if let Some(groups) = profile.paragraph_groups {
                selector(groups).unwrap();
            }
        }
    }

    #[test]
    fn test_generic_ignores_navigation_text() {
        let html = r#"
            <html><body>
              <nav><p>Home | Markets | Tech</p></nav>
              <article>
                <header><p>Share this story</p></header>
                <p>  Semiconductor   stocks rose. </p>
                <p>Analysts expect more.</p>
              </article>
              <footer><p>Copyright</p></footer>
            </body></html>
        "#;
        let content = parse_article(html, &GENERIC).unwrap();
        assert_eq!(
            content,
            ArticleContent::Text("Semiconductor stocks rose.\n\nAnalysts expect more.".into())
        );
    }

    #[test]
    fn test_stripped_tags_inside_paragraph_are_dropped() {
        let html = "<article><p>Nvidia rose.<script>trackPageView()</script></p>\
                    <p>Chips <style>.ad { color: red }</style>rallied.</p></article>";
        assert_eq!(
            parse_article(html, &GENERIC).unwrap(),
            ArticleContent::Text("Nvidia rose.\n\nChips rallied.".into())
        );
    }

    #[test]
    fn test_generic_handles_malformed_html() {
        let html = "<div><p>Unclosed paragraph <b>bold<p>Second</div></span>";
        let content = parse_article(html, &GENERIC).unwrap();
        assert!(content.is_text());
        assert!(content.to_string().contains("Unclosed paragraph"));
    }

    #[test]
    fn test_site_container_missing() {
        let html = "<html><body><p>Just a teaser</p></body></html>";
        assert_eq!(
            parse_article(html, &cnbc::ARTICLE).unwrap(),
            ArticleContent::ContainerNotFound { site: "CNBC" }
        );
    }

    #[tokio::test]
    async fn test_extract_content_rejects_non_http() {
        let ctx = ctx();
        assert_eq!(extract_content(&ctx, "ftp://example.com/a").await, ArticleContent::InvalidUrl);
        assert_eq!(extract_content(&ctx, "").await, ArticleContent::InvalidUrl);
        assert_eq!(extract_content(&ctx, "http//broken").await, ArticleContent::InvalidUrl);
    }

    #[tokio::test]
    async fn test_extract_content_unknown_domain_uses_generic() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/posts/ai-chips")
            .with_status(200)
            .with_body("<main><p>AI chips are in demand.</p><script>var x;</script></main>")
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = ScrapeContext {
            fetcher: quick_fetcher(1),
            debug: DebugArtifacts::new(tmp.path()),
        };
        let content = extract_content(&ctx, &format!("{}/posts/ai-chips", server.url())).await;
        assert_eq!(content, ArticleContent::Text("AI chips are in demand.".into()));
        assert!(tmp.path().join("generic_article_ai-chips.html").exists());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_extract_content_fetch_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let content = extract_content(&ctx(), &format!("{}/gone", server.url())).await;
        assert_eq!(
            content,
            ArticleContent::FetchFailed {
                site: "website",
                maybe_paywalled: false,
            }
        );
        assert_eq!(content.status(), "fetch_failed");
    }
}
