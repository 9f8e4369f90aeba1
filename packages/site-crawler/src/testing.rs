//! Mock collaborators for exercising the crawl engine without a real
//! browser or LLM.
//!
//! `MockRenderer` serves a fixed set of page fixtures and tracks
//! navigations and close calls; `MockSummarizer` records every batch it is
//! handed. Both are deterministic and safe under concurrent fetches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::dispatch::Summarizer;
use crate::error::{CrawlError, CrawlResult};
use crate::types::{ExtractedContent, Navigation, PageRecord};
use crate::visitor::Renderer;

/// One page fixture served by [`MockRenderer`].
struct MockPage {
    status: u16,
    final_url: Option<String>,
    content: ExtractedContent,
}

/// A renderer backed by in-memory fixtures.
#[derive(Default)]
pub struct MockRenderer {
    pages: RwLock<HashMap<String, MockPage>>,
    navigations: RwLock<Vec<String>>,
    closes: AtomicUsize,
}

impl MockRenderer {
    /// Create an empty renderer; navigation to unknown URLs fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page fixture.
    ///
    /// `final_url` simulates a redirect when it differs from `url`.
    pub fn with_page(
        self,
        url: impl Into<String>,
        status: u16,
        final_url: Option<&str>,
        content: ExtractedContent,
    ) -> Self {
        self.pages.write().unwrap().insert(
            url.into(),
            MockPage {
                status,
                final_url: final_url.map(str::to_string),
                content,
            },
        );
        self
    }

    /// All navigations in request order.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().unwrap().clone()
    }

    /// How many times a URL was navigated to.
    pub fn navigation_count(&self, url: &str) -> usize {
        self.navigations
            .read()
            .unwrap()
            .iter()
            .filter(|visited| visited.as_str() == url)
            .count()
    }

    /// How many times [`Renderer::close`] was called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn navigate(&self, url: &str, _timeout: Duration) -> CrawlResult<Navigation> {
        self.navigations.write().unwrap().push(url.to_string());

        let pages = self.pages.read().unwrap();
        match pages.get(url) {
            Some(page) => Ok(Navigation {
                final_url: page.final_url.clone().unwrap_or_else(|| url.to_string()),
                status: page.status,
            }),
            None => Err(CrawlError::Render(
                format!("no fixture for {url}").into(),
            )),
        }
    }

    async fn extract(&self, url: &str) -> CrawlResult<ExtractedContent> {
        let pages = self.pages.read().unwrap();
        if let Some(page) = pages.get(url) {
            return Ok(page.content.clone());
        }
        // The page may be registered under its pre-redirect URL
        pages
            .values()
            .find(|page| page.final_url.as_deref() == Some(url))
            .map(|page| page.content.clone())
            .ok_or_else(|| CrawlError::Render(format!("no content for {url}").into()))
    }

    async fn close(&self) -> CrawlResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A summarizer that records every batch and returns canned text.
#[derive(Default)]
pub struct MockSummarizer {
    batches: RwLock<Vec<Vec<String>>>,
    fail: bool,
}

impl MockSummarizer {
    /// Create a summarizer that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every generation call fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// The URL lists of every batch received, in dispatch order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.read().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn generate(&self, batch: &[PageRecord]) -> CrawlResult<String> {
        self.batches
            .write()
            .unwrap()
            .push(batch.iter().map(|page| page.url.clone()).collect());

        if self.fail {
            return Err(CrawlError::Generation("mock generation failure".into()));
        }
        Ok(format!("Summary of {} pages", batch.len()))
    }
}

/// Build a minimal [`PageRecord`] for tests.
pub fn page_record(url: &str) -> PageRecord {
    PageRecord {
        url: url.to_string(),
        title: String::new(),
        meta_description: String::new(),
        headings: Vec::new(),
        body_text: String::new(),
        outbound_links: Vec::new(),
        is_documentation: false,
        depth: 0,
        content_hash: PageRecord::hash_content(""),
        fetched_at: Utc::now(),
    }
}
