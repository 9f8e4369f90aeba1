//! Priority-guided site crawler.
//!
//! Discovers and fetches pages across a company's web presence (primary
//! site plus official documentation/API subdomains), prioritizes which
//! pages to fetch next, and streams fetched pages into fixed-size batches
//! for downstream summarization.
//!
//! # Design
//!
//! The engine owns URL normalization, domain-equivalence tracking, link
//! scoring, the crawl frontier, and batch dispatch. Rendering pages and
//! turning page batches into prose are external collaborators behind the
//! [`Renderer`] and [`Summarizer`] traits; the crate never talks to a
//! browser or an LLM directly.
//!
//! Per-page failures are recovered locally: a crawl that loses pages to
//! transient failures yields a partial, best-effort result. The only fatal
//! error is failing to load the seed URL itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! use site_crawler::{crawl, CrawlConfig};
//!
//! let config = CrawlConfig::new()
//!     .with_max_pages(50)
//!     .with_batch_size(5);
//!
//! let report = crawl("https://example.com", &config, &renderer, &summarizer).await?;
//! println!("visited {} pages, {} summaries", report.pages_visited, report.summaries.len());
//! ```
//!
//! # Modules
//!
//! - [`normalizer`] - URL canonicalization
//! - [`domains`] - same-site / related / documentation host tracking
//! - [`scoring`] - link filtering and priority scoring
//! - [`frontier`] - the discovered-but-unvisited queue
//! - [`visitor`] - per-page fetch and extraction via the rendering engine
//! - [`session`] - the orchestrator loop
//! - [`dispatch`] - fixed-size batch handoff to the generation collaborator
//! - [`testing`] - mock collaborators

pub mod config;
pub mod dispatch;
pub mod domains;
pub mod error;
pub mod frontier;
pub mod normalizer;
pub mod scoring;
pub mod session;
pub mod testing;
pub mod types;
pub mod visitor;

// Re-export the core API at the crate root
pub use config::CrawlConfig;
pub use dispatch::{BatchDispatcher, Summarizer};
pub use domains::{DomainClass, DomainTracker};
pub use error::{CrawlError, CrawlResult};
pub use frontier::Frontier;
pub use normalizer::normalize;
pub use scoring::ScoreWeights;
pub use session::{crawl, CrawlSession};
pub use types::{
    CandidateLink, CrawlReport, ExtractedContent, ExtractedLink, Heading, Navigation, PageRecord,
    ScoredLink,
};
pub use visitor::{PageVisitor, Renderer};
