//! Sequential collection across all listing sources.
//!
//! Sources are visited one at a time in a freshly shuffled order, with a
//! politeness pause between visits, until enough records have piled up.

use crate::config::DelayRange;
use crate::models::ArticleRecord;
use crate::scrapers::{ListingSource, ScrapeContext};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

pub struct Aggregator {
    sources: Vec<Box<dyn ListingSource>>,
    target_count: usize,
    source_delay: DelayRange,
    rng: StdRng,
}

impl Aggregator {
    pub fn new(
        sources: Vec<Box<dyn ListingSource>>,
        target_count: usize,
        source_delay: DelayRange,
        rng: StdRng,
    ) -> Self {
        Self {
            sources,
            target_count,
            source_delay,
            rng,
        }
    }

    /// Shuffle the sources, then collect from them in that order.
    pub async fn collect(&mut self, ctx: &ScrapeContext) -> Vec<ArticleRecord> {
        self.sources.shuffle(&mut self.rng);
        let order: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        info!(?order, "Source order for this run");
        self.collect_in_order(ctx).await
    }

    /// Visit sources in their current order until `target_count` is reached.
    ///
    /// The batch that crosses the target is kept whole, so the result may
    /// exceed the target by up to one source's worth of records.
    #[instrument(level = "info", skip_all, fields(target = self.target_count))]
    pub async fn collect_in_order(&mut self, ctx: &ScrapeContext) -> Vec<ArticleRecord> {
        let mut all = Vec::new();

        for (index, source) in self.sources.iter().enumerate() {
            if index > 0 {
                let pause = self.source_delay.sample(&mut self.rng);
                info!(secs = pause.as_secs_f64(), "Waiting before next source");
                sleep(pause).await;
            }

            match source.extract_listing(ctx).await {
                Ok(records) if records.is_empty() => {
                    warn!(source = source.name(), "No articles found");
                }
                Ok(records) => {
                    info!(source = source.name(), count = records.len(), "Collected articles");
                    all.extend(records);
                    if all.len() >= self.target_count {
                        info!(total = all.len(), "Reached target article count");
                        break;
                    }
                }
                Err(e) => {
                    error!(source = source.name(), error = %e, "Source failed");
                }
            }
        }

        info!(total = all.len(), "Collection finished");
        all
    }
}
