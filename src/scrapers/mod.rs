//! Listing-page scrapers for the finance news sites.
//!
//! Every site is described by a [`SiteProfile`]: where its listing lives, the
//! ordered selector strategies that locate article containers, and the
//! selector chains for headline, summary, and date inside a container. One
//! shared engine ([`parse_listing`]) walks those tables, so a markup change on
//! a site means editing a table, not control flow.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing |
//! |--------|--------|---------|
//! | Yahoo Finance | [`yahoo`] | `/topic/tech/`, falls back to `/news/` |
//! | CNBC | [`cnbc`] | `/technology/`, falls back to `/investing/` |
//! | Bloomberg | [`bloomberg`] | `/technology`, falls back to `/markets` |
//! | MarketWatch | [`marketwatch`] | `/investing/technology`, falls back to `/latest-news` |
//! | Investing.com | [`investing`] | `/news/technology`, falls back to `/news/stock-market-news` |
//!
//! Each module also carries the [`BodyProfile`](crate::content::BodyProfile)
//! used to pull article text from that site.
//!
//! # Failure Policy
//!
//! Extraction is fail-open: a container that lacks a headline or link, or
//! whose link cannot be resolved, is logged and skipped while the rest of
//! the listing is still processed.

use crate::artifacts::DebugArtifacts;
use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetcher;
use crate::models::ArticleRecord;
use crate::utils::squash_whitespace;
use futures::future::BoxFuture;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod bloomberg;
pub mod cnbc;
pub mod investing;
pub mod marketwatch;
pub mod yahoo;

/// Everything a scraper needs to talk to the outside world.
#[derive(Debug)]
pub struct ScrapeContext {
    pub fetcher: Fetcher,
    pub debug: DebugArtifacts,
}

/// A source of article records, as seen by the aggregator.
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &str;

    /// Scrape the source's listing. An empty vector means "nothing usable";
    /// an error means the source itself is broken (e.g. a bad selector).
    fn extract_listing<'a>(
        &'a self,
        ctx: &'a ScrapeContext,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>>>;
}

/// One way of finding article containers on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStrategy {
    pub selector: &'static str,
    /// Ancestor levels to climb from each match to reach the container.
    pub climb: usize,
}

impl ContainerStrategy {
    pub const fn new(selector: &'static str) -> Self {
        Self { selector, climb: 0 }
    }

    pub const fn climbing(selector: &'static str, climb: usize) -> Self {
        Self { selector, climb }
    }
}

/// Static description of one site's listing page.
#[derive(Debug)]
pub struct SiteProfile {
    /// Value of [`ArticleRecord::source`].
    pub name: &'static str,
    /// File stem of the saved listing page.
    pub artifact: &'static str,
    /// Origin that relative links are resolved against.
    pub base_url: &'static str,
    pub primary_url: &'static str,
    pub fallback_url: &'static str,
    /// Tried in order; the first strategy with any match wins.
    pub containers: &'static [ContainerStrategy],
    pub headline: &'static [&'static str],
    /// Lowercase terms marking promotional headlines.
    pub blocklist: &'static [&'static str],
    /// Use the first anchor anywhere in the container when the headline has none.
    pub container_link_fallback: bool,
    pub summary: &'static [&'static str],
    pub date: &'static [&'static str],
    /// Keep only the text after this separator (`Publisher · 2h ago`).
    pub date_separator: Option<char>,
}

/// Every listing profile, in the order sources are declared.
pub const PROFILES: [&SiteProfile; 5] = [
    &yahoo::LISTING,
    &marketwatch::LISTING,
    &cnbc::LISTING,
    &bloomberg::LISTING,
    &investing::LISTING,
];

/// Compile a CSS selector from a profile table.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn selectors(list: &[&str]) -> Result<Vec<Selector>> {
    list.iter().map(|css| selector(css)).collect()
}

/// Trimmed text of an element with internal whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    squash_whitespace(&element.text().collect::<String>())
}

/// First descendant matching any selector, trying selectors in order.
fn first_match<'a>(scope: ElementRef<'a>, chain: &[Selector]) -> Option<ElementRef<'a>> {
    chain.iter().find_map(|sel| scope.select(sel).next())
}

fn climb(element: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    let mut current = element;
    for _ in 0..levels {
        current = ElementRef::wrap(current.parent()?)?;
    }
    Some(current)
}

fn anchor_href<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    if element.value().name() != "a" {
        return None;
    }
    element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
}

struct CompiledProfile {
    headline: Vec<Selector>,
    summary: Vec<Selector>,
    date: Vec<Selector>,
    anchor: Selector,
}

impl CompiledProfile {
    fn new(profile: &SiteProfile) -> Result<Self> {
        Ok(Self {
            headline: selectors(profile.headline)?,
            summary: selectors(profile.summary)?,
            date: selectors(profile.date)?,
            anchor: selector("a[href]")?,
        })
    }

    /// The headline's own anchor, an anchor inside it, its anchor parent, and
    /// finally (if allowed) any anchor in the container.
    fn find_link<'a>(
        &self,
        container: ElementRef<'a>,
        headline: ElementRef<'a>,
        container_fallback: bool,
    ) -> Option<&'a str> {
        anchor_href(headline)
            .or_else(|| headline.select(&self.anchor).find_map(anchor_href))
            .or_else(|| headline.parent().and_then(ElementRef::wrap).and_then(anchor_href))
            .or_else(|| {
                container_fallback
                    .then(|| container.select(&self.anchor).find_map(anchor_href))
                    .flatten()
            })
    }
}

/// Resolve `href` against `base`, accepting only http(s) results.
pub(crate) fn resolve_link(base: &Url, href: &str) -> Result<String> {
    let resolved = base
        .join(href)
        .map_err(|_| ScrapeError::Link(href.to_string()))?;
    match resolved.scheme() {
        "http" | "https" => Ok(resolved.to_string()),
        _ => Err(ScrapeError::Link(href.to_string())),
    }
}

/// Elements matched by the first strategy that yields anything.
fn find_containers<'a>(
    document: &'a Html,
    strategies: &[ContainerStrategy],
) -> Result<Vec<ElementRef<'a>>> {
    for strategy in strategies {
        let sel = selector(strategy.selector)?;
        let found: Vec<ElementRef<'a>> = document
            .select(&sel)
            .filter_map(|el| climb(el, strategy.climb))
            .collect();
        if !found.is_empty() {
            debug!(selector = strategy.selector, count = found.len(), "Container strategy matched");
            return Ok(found);
        }
    }
    Ok(Vec::new())
}

fn parse_container(
    container: ElementRef<'_>,
    profile: &SiteProfile,
    compiled: &CompiledProfile,
    base: &Url,
) -> Result<Option<ArticleRecord>> {
    let Some(headline_el) = first_match(container, &compiled.headline) else {
        return Ok(None);
    };
    let headline = element_text(headline_el);
    if headline.is_empty() {
        return Ok(None);
    }

    let lowered = headline.to_lowercase();
    if let Some(term) = profile.blocklist.iter().find(|term| lowered.contains(**term)) {
        debug!(%headline, term, "Skipping promotional item");
        return Ok(None);
    }

    let Some(href) = compiled.find_link(container, headline_el, profile.container_link_fallback)
    else {
        debug!(%headline, "Skipping item without a link");
        return Ok(None);
    };
    let link = resolve_link(base, href)?;

    let summary = first_match(container, &compiled.summary)
        .map(element_text)
        .unwrap_or_default();

    let published_date = first_match(container, &compiled.date).map(|el| {
        let text = element_text(el);
        match profile.date_separator.and_then(|sep| text.split_once(sep)) {
            Some((_, date)) => date.trim().to_string(),
            None => text,
        }
    });

    Ok(Some(ArticleRecord::new(
        headline,
        summary,
        link,
        published_date,
        profile.name,
    )))
}

/// Extract article records from a listing page.
///
/// Only a broken selector in the profile is an error; everything wrong with
/// the page itself degrades to fewer records.
pub fn parse_listing(html: &str, profile: &SiteProfile) -> Result<Vec<ArticleRecord>> {
    let document = Html::parse_document(html);
    let compiled = CompiledProfile::new(profile)?;
    let base = Url::parse(profile.base_url)?;

    let containers = find_containers(&document, profile.containers)?;
    info!(site = profile.name, count = containers.len(), "Found potential articles");

    let mut records = Vec::new();
    for (index, container) in containers.into_iter().enumerate() {
        match parse_container(container, profile, &compiled, &base) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => warn!(site = profile.name, index, error = %e, "Skipping article container"),
        }
    }
    Ok(records)
}

/// A live listing scraper for one [`SiteProfile`].
#[derive(Debug, Clone)]
pub struct ListingSite {
    profile: &'static SiteProfile,
    primary_url: String,
    fallback_url: String,
}

impl ListingSite {
    pub fn new(profile: &'static SiteProfile) -> Self {
        Self {
            profile,
            primary_url: profile.primary_url.to_string(),
            fallback_url: profile.fallback_url.to_string(),
        }
    }

    /// Point the scraper at different listing URLs.
    #[cfg(test)]
    pub fn with_urls(mut self, primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.primary_url = primary.into();
        self.fallback_url = fallback.into();
        self
    }

    /// Fetch the listing (primary, then fallback URL), save it, and parse it.
    #[instrument(level = "info", skip_all, fields(site = %self.profile.name))]
    pub async fn scrape(&self, ctx: &ScrapeContext) -> Result<Vec<ArticleRecord>> {
        info!(url = %self.primary_url, "Scraping listing");
        let page = match ctx.fetcher.fetch(&self.primary_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, url = %self.fallback_url, "Trying alternative listing");
                match ctx.fetcher.fetch(&self.fallback_url).await {
                    Ok(page) => page,
                    Err(e) => {
                        warn!(error = %e, "No listing page available");
                        return Ok(Vec::new());
                    }
                }
            }
        };

        ctx.debug.save(self.profile.artifact, &page.body).await;

        let records = parse_listing(&page.body, self.profile)?;
        info!(count = records.len(), url = %page.url, "Extracted listing");
        Ok(records)
    }
}

impl ListingSource for ListingSite {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn extract_listing<'a>(
        &'a self,
        ctx: &'a ScrapeContext,
    ) -> BoxFuture<'a, Result<Vec<ArticleRecord>>> {
        Box::pin(self.scrape(ctx))
    }
}

/// The five live sources.
pub fn default_sources() -> Vec<Box<dyn ListingSource>> {
    PROFILES
        .into_iter()
        .map(|profile| Box::new(ListingSite::new(profile)) as Box<dyn ListingSource>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::DebugArtifacts;
    use crate::fetcher::tests::quick_fetcher;
    use mockito::Server;

    static TEST_PROFILE: SiteProfile = SiteProfile {
        name: "Test Wire",
        artifact: "test_wire",
        base_url: "https://news.example.com",
        primary_url: "https://news.example.com/tech",
        fallback_url: "https://news.example.com/latest",
        containers: &[
            ContainerStrategy::new("div.missing"),
            ContainerStrategy::new("div.card"),
        ],
        headline: &["h3", "h2"],
        blocklist: &["advertisement", "sponsor", "promoted"],
        container_link_fallback: false,
        summary: &["p"],
        date: &["time"],
        date_separator: None,
    };

    const THREE_CARDS: &str = r#"
        <html><body>
          <div class="card"><p>No headline here</p><a href="/news/0">read</a></div>
          <div class="card"><h3><a href="/promo">Sponsored: buy now</a></h3></div>
          <div class="card">
            <h3><a href="/news/1">Apple unveils new chip</a></h3>
            <p>The M5 is here.</p>
            <time>2 hours ago</time>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_skips_bad_containers() {
        let records = parse_listing(THREE_CARDS, &TEST_PROFILE).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.headline, "Apple unveils new chip");
        assert_eq!(record.link, "https://news.example.com/news/1");
        assert_eq!(record.summary, "The M5 is here.");
        assert_eq!(record.published_date, "2 hours ago");
        assert_eq!(record.source, "Test Wire");
        assert_eq!(record.category, "tech stocks");
    }

    #[test]
    fn test_no_strategy_matches() {
        let records = parse_listing("<html><body><p>empty</p></body></html>", &TEST_PROFILE).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_link_from_anchor_parent() {
        let html = r#"<div class="card"><a href="https://other.example.org/x"><h2>Nvidia rallies</h2></a></div>"#;
        let records = parse_listing(html, &TEST_PROFILE).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "https://other.example.org/x");
        assert_eq!(records[0].published_date, "Unknown");
    }

    #[test]
    fn test_unresolvable_link_is_skipped_not_fatal() {
        let html = r#"
            <div class="card"><h3><a href="javascript:void(0)">Tesla recall</a></h3></div>
            <div class="card"><h3><a href="/ok">Microsoft earnings</a></h3></div>
        "#;
        let records = parse_listing(html, &TEST_PROFILE).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].headline, "Microsoft earnings");
    }

    #[test]
    fn test_climbing_strategy() {
        let html = r#"<ul><li><div><h3><a href="/a">Chips stocks jump</a></h3></div><span>x</span></li></ul>"#;
        let document = Html::parse_document(html);
        let found = find_containers(&document, &[ContainerStrategy::climbing("h3", 2)]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value().name(), "li");
    }

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("https://www.bloomberg.com").unwrap();
        assert_eq!(
            resolve_link(&base, "/news/articles/x").unwrap(),
            "https://www.bloomberg.com/news/articles/x"
        );
        assert_eq!(
            resolve_link(&base, "https://finance.yahoo.com/a").unwrap(),
            "https://finance.yahoo.com/a"
        );
        assert!(resolve_link(&base, "mailto:desk@bloomberg.net").is_err());
    }

    #[test]
    fn test_every_profile_selector_compiles() {
        for profile in PROFILES {
            for strategy in profile.containers {
                selector(strategy.selector).unwrap();
            }
            CompiledProfile::new(profile).unwrap();
            Url::parse(profile.base_url).unwrap();
        }
    }

    #[test]
    fn test_profile_names_are_distinct() {
        let names: Vec<&str> = PROFILES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["Yahoo Finance", "MarketWatch", "CNBC", "Bloomberg", "Investing.com"]
        );
        assert_eq!(default_sources().len(), 5);
    }

    #[tokio::test]
    async fn test_scrape_uses_fallback_url() {
        let mut server = Server::new_async().await;
        let primary = server
            .mock("GET", "/tech")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let fallback = server
            .mock("GET", "/latest")
            .with_status(200)
            .with_body(THREE_CARDS)
            .expect(1)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = ScrapeContext {
            fetcher: quick_fetcher(1),
            debug: DebugArtifacts::new(tmp.path()),
        };
        let site = ListingSite::new(&TEST_PROFILE).with_urls(
            format!("{}/tech", server.url()),
            format!("{}/latest", server.url()),
        );

        let records = site.extract_listing(&ctx).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "https://news.example.com/news/1");
        assert!(tmp.path().join("test_wire.html").exists());

        primary.assert_async().await;
        fallback.assert_async().await;
    }

    #[tokio::test]
    async fn test_scrape_both_urls_down_is_empty() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let ctx = ScrapeContext {
            fetcher: quick_fetcher(1),
            debug: DebugArtifacts::disabled(),
        };
        let site = ListingSite::new(&TEST_PROFILE).with_urls(
            format!("{}/tech", server.url()),
            format!("{}/latest", server.url()),
        );

        assert!(site.scrape(&ctx).await.unwrap().is_empty());
        mock.assert_async().await;
    }
}
