//! Configuration for crawl runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::frontier::DEFAULT_FRONTIER_CAPACITY;
use crate::scoring::ScoreWeights;

/// Configuration for one crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum number of pages to visit successfully
    pub max_pages: usize,

    /// Maximum crawl depth (0 = only the seed page)
    pub max_depth: usize,

    /// Number of simultaneous page fetches
    pub concurrency: usize,

    /// Pages per batch handed to the generation collaborator
    pub batch_size: usize,

    /// Per-navigation timeout in seconds
    pub navigation_timeout_secs: u64,

    /// Bound on queued frontier links
    pub frontier_capacity: usize,

    /// Fetch attempts per URL before it is marked permanently failed.
    /// 1 means failed fetches are never retried within a run.
    pub max_fetch_attempts: u32,

    /// Optional cap on navigations per second across the run
    pub requests_per_second: Option<u32>,

    /// Link scoring profile
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 30,
            max_depth: 3,
            concurrency: 3,
            batch_size: 5,
            navigation_timeout_secs: 30,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
            max_fetch_attempts: 1,
            requests_per_second: None,
            weights: ScoreWeights::default(),
        }
    }
}

impl CrawlConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page budget.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the depth bound.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set fetch concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the dispatch batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the per-navigation timeout.
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Allow retrying failed fetches within a run.
    pub fn with_max_fetch_attempts(mut self, attempts: u32) -> Self {
        self.max_fetch_attempts = attempts.max(1);
        self
    }

    /// Cap navigations per second.
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Override the scoring profile.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The navigation timeout as a [`Duration`].
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}
