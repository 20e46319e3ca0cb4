//! Pipeline tunables.
//!
//! Every knob has a built-in default matching the values the scraper has always
//! used. An optional YAML file can override any subset of them:
//!
//! ```yaml
//! target_count: 30
//! max_attempts: 2
//! source_delay:
//!   min_secs: 1.0
//!   max_secs: 2.0
//! ```

use crate::error::{Result, ScrapeError};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Terms that mark a headline or summary as tech-stock news.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "tech",
    "technology",
    "apple",
    "microsoft",
    "google",
    "alphabet",
    "amazon",
    "tesla",
    "nvidia",
    "semiconductor",
    "ai",
    "artificial intelligence",
    "meta",
    "facebook",
    "netflix",
    "cloud",
    "cybersecurity",
    "software",
    "hardware",
    "chips",
    "intel",
    "amd",
    "tsmc",
    "broadcom",
    "oracle",
    "salesforce",
    "aapl",
    "msft",
    "googl",
    "goog",
    "amzn",
    "tsla",
    "nvda",
    "nflx",
];

/// Longest pause any delay window may ask for.
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// A uniform random delay window, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// No waiting at all.
    #[cfg(test)]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Draw a duration from the window.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs_f64(self.min_secs.max(0.0));
        }
        Duration::from_secs_f64(rng.random_range(self.min_secs..=self.max_secs))
    }

    /// Rejects NaN, negative and inverted windows, and anything longer than
    /// [`MAX_DELAY_SECS`].
    fn validate(&self, name: &str) -> Result<()> {
        let ordered = self.min_secs >= 0.0 && self.min_secs <= self.max_secs;
        if !(ordered && self.max_secs <= MAX_DELAY_SECS) {
            return Err(ScrapeError::Config(format!(
                "{name}: expected 0 <= min_secs <= max_secs <= {MAX_DELAY_SECS}, got {}..{}",
                self.min_secs, self.max_secs
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stop asking further sources once this many records are collected.
    pub target_count: usize,
    /// HTTP attempts per URL.
    pub max_attempts: u32,
    pub timeout_secs: u64,
    /// Wait after a 401/403/429 answer.
    pub blocked_backoff: DelayRange,
    /// Wait before every retry.
    pub retry_backoff: DelayRange,
    /// Wait between two listing sources.
    pub source_delay: DelayRange,
    pub keywords: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_count: 50,
            max_attempts: 3,
            timeout_secs: 20,
            blocked_backoff: DelayRange::new(5.0, 10.0),
            retry_backoff: DelayRange::new(3.0, 7.0),
            source_delay: DelayRange::new(5.0, 10.0),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document, filling gaps with defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(
            target_count = config.target_count,
            max_attempts = config.max_attempts,
            keywords = config.keywords.len(),
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(ScrapeError::Config("target_count must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(ScrapeError::Config("max_attempts must be at least 1".into()));
        }
        if self.keywords.is_empty() {
            return Err(ScrapeError::Config("keywords must not be empty".into()));
        }
        self.blocked_backoff.validate("blocked_backoff")?;
        self.retry_backoff.validate("retry_backoff")?;
        self.source_delay.validate("source_delay")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_defaults_match_scraper_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_count, 50);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.blocked_backoff, DelayRange::new(5.0, 10.0));
        assert_eq!(config.retry_backoff, DelayRange::new(3.0, 7.0));
        assert!(config.keywords.iter().any(|k| k == "nvda"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PipelineConfig::from_yaml_str(
            "target_count: 10\nsource_delay:\n  min_secs: 1.0\n  max_secs: 2.0\n",
        )
        .unwrap();
        assert_eq!(config.target_count, 10);
        assert_eq!(config.source_delay, DelayRange::new(1.0, 2.0));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.keywords.len(), DEFAULT_KEYWORDS.len());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = PipelineConfig::from_yaml_str(
            "retry_backoff:\n  min_secs: 7.0\n  max_secs: 3.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn test_rejects_unbounded_delays() {
        for yaml in [
            "source_delay: {min_secs: 1.0, max_secs: 1.0e30}",
            "retry_backoff: {min_secs: 1.0, max_secs: .inf}",
            "blocked_backoff: {min_secs: .nan, max_secs: 2.0}",
            "source_delay: {min_secs: -1.0, max_secs: 2.0}",
        ] {
            let err = PipelineConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ScrapeError::Config(_)), "{yaml}");
        }
        assert!(PipelineConfig::from_yaml_str("source_delay: {min_secs: 0.0, max_secs: 3600.0}").is_ok());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        assert!(PipelineConfig::from_yaml_str("max_attempts: 0").is_err());
    }

    #[test]
    fn test_delay_range_sample_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = DelayRange::new(0.5, 1.5);
        for _ in 0..100 {
            let d = range.sample(&mut rng).as_secs_f64();
            assert!((0.5..=1.5).contains(&d));
        }
        assert_eq!(DelayRange::zero().sample(&mut rng), Duration::ZERO);
    }
}
