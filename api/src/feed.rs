use crate::Game;
use crate::aggregate::{Aggregator, DayPipeline};
use crate::client::{ApiResult, NbaApi};
use crate::config::FeedConfig;
use crate::enrich::EnrichmentCascade;
use crate::scoreboard::{CascadingFetcher, CdnScoreboard, StatsScoreboard};

type LivePipeline = DayPipeline<CdnScoreboard, StatsScoreboard, NbaApi>;

/// The assembled feed: CDN scoreboard with stats.nba.com fallback, leader
/// enrichment, and the multi-day window.
#[derive(Debug, Clone)]
pub struct NbaFeed {
    aggregator: Aggregator<LivePipeline>,
}

impl NbaFeed {
    pub fn new(config: FeedConfig) -> ApiResult<Self> {
        let api = NbaApi::new(&config)?;
        let scoreboards = CascadingFetcher::new(CdnScoreboard::new(api.clone()), StatsScoreboard::new(api.clone()));
        let pipeline = DayPipeline::new(scoreboards, EnrichmentCascade::new(api));
        Ok(Self { aggregator: Aggregator::new(pipeline, config.window, config.concurrency) })
    }

    pub async fn aggregate(&self) -> Vec<Game> {
        self.aggregator.aggregate().await
    }

    pub async fn aggregate_from(&self, today: chrono::NaiveDate) -> Vec<Game> {
        self.aggregator.aggregate_from(today).await
    }
}
