//! Error types shared by the fetcher, scrapers, and output writers.
//!
//! Most failures inside the pipeline are recovered locally (a container is
//! skipped, a source yields nothing), so these errors mostly travel a short
//! distance before being logged. Only configuration and output-directory
//! problems make it out to `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Every attempt for a URL failed or was blocked.
    #[error("gave up on {url} after {attempts} attempt(s)")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// An `href` that does not resolve to an http(s) URL.
    #[error("unresolvable link `{0}`")]
    Link(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
