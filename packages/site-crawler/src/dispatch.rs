//! Batch dispatch: accumulates visited pages and hands fixed-size batches
//! to the generation collaborator.
//!
//! Batches partition successful pages in discovery order with no
//! duplicates; the final batch may be smaller. A generation failure is
//! counted, not fatal: the crawl trades completeness for progress.

use async_trait::async_trait;

use crate::error::CrawlResult;
use crate::types::PageRecord;

/// The external generation collaborator contract.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Turn a batch of pages into prose.
    async fn generate(&self, batch: &[PageRecord]) -> CrawlResult<String>;
}

/// Accumulates pages and emits fixed-size batches.
pub struct BatchDispatcher<'a, G: Summarizer> {
    generator: &'a G,
    batch_size: usize,
    open: Vec<PageRecord>,
    batches_emitted: usize,
    batches_failed: usize,
    summaries: Vec<String>,
}

impl<'a, G: Summarizer> BatchDispatcher<'a, G> {
    /// Create a dispatcher emitting batches of `batch_size` pages.
    pub fn new(generator: &'a G, batch_size: usize) -> Self {
        Self {
            generator,
            batch_size: batch_size.max(1),
            open: Vec::new(),
            batches_emitted: 0,
            batches_failed: 0,
            summaries: Vec::new(),
        }
    }

    /// Append a page to the open batch, emitting when the threshold is hit.
    pub async fn accept(&mut self, page: PageRecord) {
        self.open.push(page);
        if self.open.len() >= self.batch_size {
            self.emit().await;
        }
    }

    /// Emit whatever remains in the open batch.
    pub async fn flush(&mut self) {
        if !self.open.is_empty() {
            self.emit().await;
        }
    }

    async fn emit(&mut self) {
        let batch = std::mem::take(&mut self.open);
        tracing::info!(pages = batch.len(), "dispatching batch for generation");

        match self.generator.generate(&batch).await {
            Ok(text) => {
                self.batches_emitted += 1;
                self.summaries.push(text);
            }
            Err(error) => {
                self.batches_failed += 1;
                tracing::warn!(
                    pages = batch.len(),
                    error = %error,
                    "generation failed for batch"
                );
            }
        }
    }

    /// Number of batches generated successfully.
    pub fn batches_emitted(&self) -> usize {
        self.batches_emitted
    }

    /// Number of batches the generator failed on.
    pub fn batches_failed(&self) -> usize {
        self.batches_failed
    }

    /// Consume the dispatcher, yielding the generated text in batch order.
    pub fn into_summaries(self) -> Vec<String> {
        self.summaries
    }
}
