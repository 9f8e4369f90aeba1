//! Core data types flowing through the crawl engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A heading extracted from a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,

    /// Visible heading text
    pub text: String,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// A link discovered on a visited page, before filtering and scoring.
///
/// Ephemeral: produced per extracted page and either promoted into the
/// frontier as a [`ScoredLink`] or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    /// Resolved absolute URL (not yet normalized)
    pub url: String,

    /// Best-effort anchor text
    pub anchor_text: String,

    /// Whether the link was found inside a navigation/menu/sidebar region
    pub nav_origin: bool,

    /// Depth of the page the link was found on
    pub source_depth: usize,
}

/// A candidate link with its frontier priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLink {
    /// The underlying link, with a normalized URL
    pub link: CandidateLink,

    /// Priority score; higher is crawled sooner
    pub score: i32,

    /// Depth the page would be visited at (source depth + 1)
    pub depth: usize,
}

/// An immutable record of one successfully visited page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Normalized final URL (post-redirect)
    pub url: String,

    /// Page title
    pub title: String,

    /// Meta description, empty if absent
    pub meta_description: String,

    /// Headings grouped in document order
    pub headings: Vec<Heading>,

    /// Visible body text (scripts, styles, and hidden nodes excluded)
    pub body_text: String,

    /// Outbound anchors with resolved absolute URLs
    pub outbound_links: Vec<CandidateLink>,

    /// Whether the page was classified as documentation
    pub is_documentation: bool,

    /// Crawl depth the page was visited at
    pub depth: usize,

    /// SHA-256 hash of the body text
    pub content_hash: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl PageRecord {
    /// Calculate SHA-256 hash of page content.
    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Result of asking the rendering engine to navigate to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// URL the navigation ended on (differs from the request on redirect)
    pub final_url: String,

    /// HTTP status of the final response
    pub status: u16,
}

/// An anchor as reported by the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Href attribute, absolute or relative
    pub href: String,

    /// Best-effort link text (anchor text, title, aria-label, or alt)
    pub text: String,

    /// Whether the anchor sits inside a navigation/menu/sidebar region
    pub nav_origin: bool,
}

/// Structured data pulled out of a rendered page.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Page title
    pub title: String,

    /// Meta description, empty if absent
    pub meta_description: String,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Visible body text
    pub body_text: String,

    /// All anchors found on the page
    pub links: Vec<ExtractedLink>,
}

impl ExtractedContent {
    /// Create content with a title and body.
    pub fn new(title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_text: body_text.into(),
            ..Default::default()
        }
    }

    /// Set the meta description.
    pub fn with_meta_description(mut self, description: impl Into<String>) -> Self {
        self.meta_description = description.into();
        self
    }

    /// Add a heading.
    pub fn with_heading(mut self, level: u8, text: impl Into<String>) -> Self {
        self.headings.push(Heading::new(level, text));
        self
    }

    /// Add a body-text link.
    pub fn with_link(mut self, href: impl Into<String>, text: impl Into<String>) -> Self {
        self.links.push(ExtractedLink {
            href: href.into(),
            text: text.into(),
            nav_origin: false,
        });
        self
    }

    /// Add a link found in a navigation region.
    pub fn with_nav_link(mut self, href: impl Into<String>, text: impl Into<String>) -> Self {
        self.links.push(ExtractedLink {
            href: href.into(),
            text: text.into(),
            nav_origin: true,
        });
        self
    }
}

/// Final report for one crawl run.
///
/// Per-page failure detail is not surfaced beyond aggregate counts: a crawl
/// that loses pages to transient failures yields a partial result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Unique id for this run
    pub session_id: Uuid,

    /// Normalized seed URL the crawl started from
    pub seed: String,

    /// Successfully visited pages in discovery order
    pub pages: Vec<PageRecord>,

    /// Number of pages visited successfully
    pub pages_visited: usize,

    /// Number of pages that failed permanently this run
    pub pages_failed: usize,

    /// Number of links accepted into the frontier
    pub links_discovered: usize,

    /// Number of batches handed to the generation collaborator
    pub batches_emitted: usize,

    /// Number of batches the generation collaborator failed on
    pub batches_failed: usize,

    /// Generated text, one entry per successful batch
    pub summaries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let hash = PageRecord::hash_content("Hello, world!");
        assert_eq!(hash.len(), 64); // SHA-256 hex
        assert_eq!(hash, PageRecord::hash_content("Hello, world!"));
        assert_ne!(hash, PageRecord::hash_content("Hello, universe!"));
    }

    #[test]
    fn test_extracted_content_builder() {
        let content = ExtractedContent::new("Home", "Welcome")
            .with_meta_description("A company")
            .with_heading(1, "Welcome")
            .with_link("/about", "About us")
            .with_nav_link("/docs", "Docs");

        assert_eq!(content.headings.len(), 1);
        assert_eq!(content.links.len(), 2);
        assert!(!content.links[0].nav_origin);
        assert!(content.links[1].nav_origin);
    }
}
