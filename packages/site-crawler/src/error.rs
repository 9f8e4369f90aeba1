//! Typed errors for the crawl engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Almost everything that goes wrong during a crawl is recovered locally:
//! malformed links are dropped, failed pages are logged and skipped. The
//! only crawl-fatal errors are an unusable seed URL and a failed seed fetch.

use thiserror::Error;

/// Errors that can occur during a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL could not be parsed; nothing can be crawled.
    #[error("invalid seed URL: {url}")]
    InvalidSeed { url: String },

    /// The seed page itself failed to load. Fatal: a crawl that cannot
    /// load its seed must not report a zero-page success.
    #[error("seed fetch failed for {url}")]
    SeedFetch {
        url: String,
        #[source]
        source: Box<CrawlError>,
    },

    /// The rendering engine failed to navigate or extract.
    #[error("render engine error: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Navigation completed with an error status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Navigation did not complete within the configured timeout.
    #[error("timeout navigating to {url}")]
    Timeout { url: String },

    /// The generation collaborator failed to produce text for a batch.
    #[error("generation error: {0}")]
    Generation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
