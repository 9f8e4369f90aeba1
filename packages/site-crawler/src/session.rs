//! Crawl orchestration.
//!
//! A [`CrawlSession`] owns one domain tracker, frontier, and set of run
//! counters, so independent sessions can run concurrently. The session
//! drains the frontier in concurrency-bounded batches, feeds newly
//! discovered links back in, and streams visited pages through the batch
//! dispatcher.
//!
//! All tracker and frontier writes happen in the single orchestrator loop,
//! between fetch batches; the concurrent part is fetching only.

use std::collections::HashMap;
use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use uuid::Uuid;

use crate::config::CrawlConfig;
use crate::dispatch::{BatchDispatcher, Summarizer};
use crate::domains::DomainTracker;
use crate::error::{CrawlError, CrawlResult};
use crate::frontier::Frontier;
use crate::normalizer::normalize;
use crate::scoring;
use crate::types::{CandidateLink, CrawlReport, PageRecord, ScoredLink};
use crate::visitor::{PageVisitor, Renderer};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Run a full crawl from a seed URL.
///
/// The renderer handle is closed exactly once on every exit path,
/// including the fatal seed-failure paths.
pub async fn crawl<R, G>(
    seed: &str,
    config: &CrawlConfig,
    renderer: &R,
    generator: &G,
) -> CrawlResult<CrawlReport>
where
    R: Renderer,
    G: Summarizer,
{
    let result = match CrawlSession::new(seed, config) {
        Ok(session) => session.run(renderer, generator).await,
        Err(error) => Err(error),
    };

    if let Err(error) = renderer.close().await {
        tracing::warn!(error = %error, "failed to close renderer");
    }

    result
}

/// State for one crawl run.
pub struct CrawlSession<'a> {
    config: &'a CrawlConfig,
    session_id: Uuid,
    seed: String,
    tracker: DomainTracker,
    frontier: Frontier,
    pages: Vec<PageRecord>,
    pages_failed: usize,
    links_discovered: usize,
    fetch_attempts: HashMap<String, u32>,
}

impl<'a> CrawlSession<'a> {
    /// Create a session for a seed URL. Fails only on an unparseable seed.
    pub fn new(seed: &str, config: &'a CrawlConfig) -> CrawlResult<Self> {
        let seed = normalize(seed);
        let tracker = DomainTracker::new(&seed)?;

        Ok(Self {
            config,
            session_id: Uuid::new_v4(),
            seed,
            tracker,
            frontier: Frontier::new(config.max_depth, config.frontier_capacity),
            pages: Vec::new(),
            pages_failed: 0,
            links_discovered: 0,
            fetch_attempts: HashMap::new(),
        })
    }

    /// Drive the crawl to completion and build the report.
    pub async fn run<R, G>(mut self, renderer: &R, generator: &G) -> CrawlResult<CrawlReport>
    where
        R: Renderer,
        G: Summarizer,
    {
        tracing::info!(
            session_id = %self.session_id,
            seed = %self.seed,
            max_pages = self.config.max_pages,
            max_depth = self.config.max_depth,
            "starting crawl"
        );

        let visitor = PageVisitor::new(renderer, self.config.navigation_timeout());
        let limiter: Option<DirectRateLimiter> = self
            .config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));
        let mut dispatcher = BatchDispatcher::new(generator, self.config.batch_size);

        // The seed page is the one fetch whose failure is fatal
        if let Some(limiter) = &limiter {
            limiter.until_ready().await;
        }
        let seed_record = visitor.try_visit(&self.seed, 0).await.map_err(|source| {
            CrawlError::SeedFetch {
                url: self.seed.clone(),
                source: Box::new(source),
            }
        })?;

        self.frontier.mark_visited(&self.seed);
        if seed_record.url != self.seed {
            self.tracker.add_domain(&seed_record.url);
            self.frontier.mark_visited(&seed_record.url);
        }
        let inserted = self.enqueue_links(&seed_record);
        self.links_discovered += inserted;
        self.pages.push(seed_record.clone());
        dispatcher.accept(seed_record).await;

        while self.pages.len() < self.config.max_pages && !self.frontier.is_empty() {
            let budget_left = self.config.max_pages - self.pages.len();
            let batch = self
                .frontier
                .next_batch(self.config.concurrency.max(1).min(budget_left));
            if batch.is_empty() {
                break;
            }

            // Fetch the batch concurrently; completion order may differ
            // from request order, results are joined at the batch boundary
            let outcomes = futures::future::join_all(batch.into_iter().map(|entry| {
                let visitor = &visitor;
                let limiter = limiter.as_ref();
                async move {
                    if let Some(limiter) = limiter {
                        limiter.until_ready().await;
                    }
                    let outcome = visitor.visit(&entry.link.url, entry.depth).await;
                    (entry, outcome)
                }
            }))
            .await;

            // Mark the whole batch visited before feeding discoveries back,
            // so same-batch pages cannot re-enqueue each other
            let mut successes = Vec::new();
            for (entry, outcome) in outcomes {
                let requested = entry.link.url.clone();
                match outcome {
                    Some(record) => {
                        self.frontier.mark_visited(&requested);
                        if record.url != requested {
                            self.tracker.add_domain(&record.url);
                            // Redirects can land on an already-visited target
                            // (another alias, or the seed itself); one crawl
                            // target gets one record
                            if self.frontier.is_visited(&record.url) {
                                tracing::debug!(
                                    url = %record.url,
                                    requested = %requested,
                                    "redirect target already visited, record dropped"
                                );
                                continue;
                            }
                            self.frontier.mark_visited(&record.url);
                        }
                        successes.push(record);
                    }
                    None => self.handle_failed_fetch(entry, requested),
                }
            }

            for record in successes {
                let inserted = self.enqueue_links(&record);
                self.links_discovered += inserted;
                self.pages.push(record.clone());
                dispatcher.accept(record).await;
            }
        }

        dispatcher.flush().await;

        tracing::info!(
            session_id = %self.session_id,
            pages_visited = self.pages.len(),
            pages_failed = self.pages_failed,
            links_discovered = self.links_discovered,
            batches_emitted = dispatcher.batches_emitted(),
            "crawl complete"
        );

        Ok(CrawlReport {
            session_id: self.session_id,
            seed: self.seed,
            pages_visited: self.pages.len(),
            pages_failed: self.pages_failed,
            links_discovered: self.links_discovered,
            batches_emitted: dispatcher.batches_emitted(),
            batches_failed: dispatcher.batches_failed(),
            summaries: dispatcher.into_summaries(),
            pages: self.pages,
        })
    }

    /// Filter, classify, score, and enqueue a page's outbound links.
    /// Returns how many entered the frontier.
    fn enqueue_links(&mut self, record: &PageRecord) -> usize {
        let mut inserted = 0;

        for link in &record.outbound_links {
            if !scoring::is_crawlable(&link.url) {
                continue;
            }

            let normalized = normalize(&link.url);
            let class = self.tracker.classify(&normalized);
            self.tracker.record(&normalized, class);
            if !class.is_related() {
                continue;
            }

            let candidate = CandidateLink {
                url: normalized,
                ..link.clone()
            };
            let score = scoring::score(&candidate, &self.tracker, &self.config.weights);
            let scored = ScoredLink {
                link: candidate,
                score,
                depth: record.depth + 1,
            };

            if self.frontier.insert(scored) {
                inserted += 1;
            }
        }

        tracing::debug!(
            url = %record.url,
            candidates = record.outbound_links.len(),
            inserted,
            "links enqueued"
        );
        inserted
    }

    /// Apply the retry policy to a failed fetch. With attempts left the
    /// entry goes back into the frontier at its old score; otherwise the
    /// URL is marked visited and is permanently failed this run.
    fn handle_failed_fetch(&mut self, entry: ScoredLink, requested: String) {
        let attempts = self.fetch_attempts.entry(requested.clone()).or_insert(0);
        *attempts += 1;

        if *attempts >= self.config.max_fetch_attempts {
            self.frontier.mark_visited(&requested);
            self.pages_failed += 1;
        } else {
            tracing::debug!(
                url = %requested,
                attempt = *attempts,
                "requeueing failed fetch"
            );
            self.frontier.insert(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRenderer, MockSummarizer};
    use crate::types::ExtractedContent;

    fn seed_site() -> MockRenderer {
        MockRenderer::new()
            .with_page(
                "https://example.com/",
                200,
                None,
                ExtractedContent::new("Example", "We build things")
                    .with_nav_link("https://docs.example.com/", "Documentation")
                    .with_link("/about", "About us")
                    .with_link("/blog/post-1", "A post"),
            )
            .with_page(
                "https://docs.example.com/",
                200,
                None,
                ExtractedContent::new("Docs", "Reference material"),
            )
            .with_page(
                "https://example.com/about",
                200,
                None,
                ExtractedContent::new("About", "Founded in a garage"),
            )
            .with_page(
                "https://example.com/blog/post-1",
                200,
                None,
                ExtractedContent::new("Post", "Hot takes"),
            )
    }

    #[tokio::test]
    async fn test_documentation_is_visited_before_blog() {
        let renderer = seed_site();
        let generator = MockSummarizer::new();
        let config = CrawlConfig::new().with_concurrency(1);

        let report = crawl("https://example.com", &config, &renderer, &generator)
            .await
            .unwrap();

        assert_eq!(report.pages_visited, 4);
        let navigations = renderer.navigations();
        let docs_pos = navigations
            .iter()
            .position(|u| u == "https://docs.example.com/")
            .unwrap();
        let blog_pos = navigations
            .iter()
            .position(|u| u == "https://example.com/blog/post-1")
            .unwrap();
        assert!(docs_pos < blog_pos);
    }

    #[tokio::test]
    async fn test_invalid_seed_still_closes_renderer() {
        let renderer = MockRenderer::new();
        let generator = MockSummarizer::new();
        let config = CrawlConfig::new();

        let result = crawl("::garbage::", &config, &renderer, &generator).await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
        assert_eq!(renderer.close_count(), 1);
    }

    #[tokio::test]
    async fn test_page_budget_stops_the_crawl() {
        let renderer = seed_site();
        let generator = MockSummarizer::new();
        let config = CrawlConfig::new().with_max_pages(2).with_concurrency(1);

        let report = crawl("https://example.com", &config, &renderer, &generator)
            .await
            .unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(renderer.navigations().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried_when_configured() {
        let renderer = MockRenderer::new().with_page(
            "https://example.com/",
            200,
            None,
            ExtractedContent::new("Home", "hi").with_link("/broken", "Broken"),
        );
        let generator = MockSummarizer::new();
        let config = CrawlConfig::new().with_max_fetch_attempts(2);

        let report = crawl("https://example.com", &config, &renderer, &generator)
            .await
            .unwrap();

        assert_eq!(report.pages_failed, 1);
        assert_eq!(renderer.navigation_count("https://example.com/broken"), 2);
    }
}
