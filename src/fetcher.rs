//! HTTP page fetching with browser-like headers and randomized backoff.
//!
//! Finance sites are quick to block obvious bots, so every attempt goes out
//! with a user agent drawn from a small pool of real browser strings, the
//! usual `Accept*` headers, a Google referer, and cookie-consent cookies that
//! skip the European consent interstitials.
//!
//! # Retry Strategy
//!
//! - Up to `max_attempts` tries per URL (3 by default)
//! - `200` returns immediately
//! - `401`/`403`/`429` count as "blocked" and sleep 5-10s
//! - Any attempt after the first is preceded by a 3-7s sleep
//! - Exhaustion yields [`ScrapeError::FetchExhausted`], which callers treat as
//!   "no data" rather than a fatal error

use crate::config::{DelayRange, PipelineConfig};
use crate::error::{Result, ScrapeError};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use reqwest::cookie::Jar;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HeaderMap, HeaderValue,
    REFERER, USER_AGENT, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{Client, StatusCode};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Browser user agents rotated per attempt.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/109.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.2 Mobile/15E148 Safari/604.1",
];

pub const REFERER_URL: &str = "https://www.google.com/";

/// Cookie domain and a URL on that domain for each pre-seeded consent cookie.
const CONSENT_COOKIES: [(&str, &str); 4] = [
    (".yahoo.com", "https://finance.yahoo.com/"),
    (".bloomberg.com", "https://www.bloomberg.com/"),
    (".marketwatch.com", "https://www.marketwatch.com/"),
    (".cnbc.com", "https://www.cnbc.com/"),
];

/// How hard the fetcher tries before giving up on a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub blocked_backoff: DelayRange,
    pub retry_backoff: DelayRange,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            timeout: Duration::from_secs(config.timeout_secs),
            blocked_backoff: config.blocked_backoff,
            retry_backoff: config.retry_backoff,
        }
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub body: String,
}

/// Sequential HTTP client shared by every scraper.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").field("policy", &self.policy).finish()
    }
}

fn is_blocked(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    )
}

fn consent_jar() -> Result<Jar> {
    let jar = Jar::default();
    for (domain, url) in CONSENT_COOKIES {
        let url = Url::parse(url)?;
        jar.add_cookie_str(
            &format!("cookieconsent_status=dismiss; Domain={domain}; Path=/"),
            &url,
        );
    }
    Ok(jar)
}

impl Fetcher {
    /// Build the client, its cookie jar, and take ownership of `rng` for
    /// user-agent and backoff draws.
    pub fn new(policy: RetryPolicy, rng: StdRng) -> Result<Self> {
        let client = Client::builder()
            .cookie_provider(Arc::new(consent_jar()?))
            .timeout(policy.timeout)
            .build()?;
        Ok(Self {
            client,
            policy,
            rng: Mutex::new(rng),
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// A fresh browser-like header set.
    pub fn random_headers(&self) -> HeaderMap {
        let agent = self.with_rng(|rng| *USER_AGENTS.choose(rng).unwrap_or(&USER_AGENTS[0]));
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(agent));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
        headers
    }

    fn draw(&self, range: DelayRange) -> Duration {
        self.with_rng(|rng| range.sample(rng))
    }

    /// Fetch `url` using the policy's attempt budget.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        self.fetch_with_attempts(url, self.policy.max_attempts).await
    }

    /// Fetch `url`, making at most `max_attempts` requests.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_with_attempts(&self, url: &str, max_attempts: u32) -> Result<Page> {
        let total_t0 = Instant::now();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.draw(self.policy.retry_backoff);
                debug!(attempt, ?delay, "Waiting before retry");
                sleep(delay).await;
            }

            info!(attempt, max = max_attempts, "Fetching page");
            let attempt_t0 = Instant::now();
            match self.client.get(url).headers(self.random_headers()).send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, status = status.as_u16(), "Received response");

                    if status == StatusCode::OK {
                        match response.text().await {
                            Ok(body) => {
                                info!(
                                    attempt,
                                    bytes = body.len(),
                                    elapsed_ms_total = total_t0.elapsed().as_millis(),
                                    "Fetched page"
                                );
                                return Ok(Page {
                                    url: url.to_string(),
                                    body,
                                });
                            }
                            Err(e) => {
                                warn!(attempt, error = %e, "Failed reading response body");
                            }
                        }
                    } else if is_blocked(status) {
                        let delay = self.draw(self.policy.blocked_backoff);
                        warn!(
                            attempt,
                            status = status.as_u16(),
                            ?delay,
                            "Access denied; the site may be blocking scrapers"
                        );
                        sleep(delay).await;
                    } else {
                        warn!(attempt, status = status.as_u16(), "Unexpected status; retrying");
                    }
                }
                Err(e) => {
                    warn!(
                        attempt,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis(),
                        error = %e,
                        "Request error"
                    );
                }
            }
        }

        warn!(
            attempts = max_attempts,
            elapsed_ms_total = total_t0.elapsed().as_millis(),
            "Giving up on page"
        );
        Err(ScrapeError::FetchExhausted {
            url: url.to_string(),
            attempts: max_attempts,
        })
    }
}
