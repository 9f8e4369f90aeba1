//! Page visiting: drives the rendering engine for one URL at a time.
//!
//! The engine behind [`Renderer`] is expected to be a headless browser or
//! equivalent; this crate only depends on the trait. A single page failure
//! must never abort the crawl, so [`PageVisitor::visit`] converts every
//! error into `None` and leaves the fatal-or-not decision to the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use crate::error::{CrawlError, CrawlResult};
use crate::normalizer::normalize;
use crate::scoring;
use crate::types::{CandidateLink, ExtractedContent, Navigation, PageRecord};

/// The external rendering engine contract.
///
/// One handle is shared across all fetches in a run and must be released
/// exactly once via [`Renderer::close`] on every exit path.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to a URL with a bounded timeout.
    async fn navigate(&self, url: &str, timeout: Duration) -> CrawlResult<Navigation>;

    /// Extract structured data from a page previously navigated to.
    ///
    /// `url` is the final URL reported by [`Renderer::navigate`], so
    /// implementations can key concurrent page handles by URL.
    async fn extract(&self, url: &str) -> CrawlResult<ExtractedContent>;

    /// Release the underlying browser/context handle.
    async fn close(&self) -> CrawlResult<()>;
}

/// Fetches one URL through the renderer and produces a [`PageRecord`].
pub struct PageVisitor<'a, R: Renderer> {
    renderer: &'a R,
    timeout: Duration,
}

impl<'a, R: Renderer> PageVisitor<'a, R> {
    /// Create a visitor with a per-navigation timeout.
    pub fn new(renderer: &'a R, timeout: Duration) -> Self {
        Self { renderer, timeout }
    }

    /// Visit a URL. Any navigation or extraction failure is logged and
    /// converted to `None`.
    pub async fn visit(&self, url: &str, depth: usize) -> Option<PageRecord> {
        match self.try_visit(url, depth).await {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "page visit failed");
                None
            }
        }
    }

    /// Visit a URL, surfacing the failure. Used for the seed page, where
    /// failure is fatal to the run.
    pub async fn try_visit(&self, url: &str, depth: usize) -> CrawlResult<PageRecord> {
        let navigation = match tokio::time::timeout(
            self.timeout,
            self.renderer.navigate(url, self.timeout),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(CrawlError::Timeout {
                    url: url.to_string(),
                })
            }
        };

        if navigation.status >= 400 {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: navigation.status,
            });
        }

        let content = self.renderer.extract(&navigation.final_url).await?;
        let final_url = normalize(&navigation.final_url);
        let outbound_links = resolve_links(&final_url, &content, depth);
        let is_documentation =
            scoring::is_documentation_url(&final_url) || content_says_documentation(&content);
        let content_hash = PageRecord::hash_content(&content.body_text);

        tracing::debug!(
            url = %final_url,
            depth,
            links = outbound_links.len(),
            is_documentation,
            "page visited"
        );

        Ok(PageRecord {
            url: final_url,
            title: content.title,
            meta_description: content.meta_description,
            headings: content.headings,
            body_text: content.body_text,
            outbound_links,
            is_documentation,
            depth,
            content_hash,
            fetched_at: Utc::now(),
        })
    }
}

/// Resolve extracted hrefs against the page URL into absolute candidates.
/// Unresolvable hrefs are dropped.
fn resolve_links(page_url: &str, content: &ExtractedContent, depth: usize) -> Vec<CandidateLink> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(_) => return Vec::new(),
    };

    content
        .links
        .iter()
        .filter_map(|link| {
            let absolute = base.join(&link.href).ok()?;
            Some(CandidateLink {
                url: absolute.to_string(),
                anchor_text: link.text.clone(),
                nav_origin: link.nav_origin,
                source_depth: depth,
            })
        })
        .collect()
}

/// Content-level documentation signals, complementing the URL heuristics.
fn content_says_documentation(content: &ExtractedContent) -> bool {
    let title = content.title.to_lowercase();
    if title.contains("documentation") || title.contains("api reference") {
        return true;
    }
    content.headings.iter().any(|heading| {
        let text = heading.text.to_lowercase();
        text.contains("documentation") || text.contains("api reference")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRenderer;

    #[tokio::test]
    async fn test_visit_extracts_record() {
        let renderer = MockRenderer::new().with_page(
            "https://example.com/",
            200,
            None,
            ExtractedContent::new("Home", "Welcome to Example")
                .with_heading(1, "Welcome")
                .with_link("/about", "About")
                .with_nav_link("https://docs.example.com/", "Docs"),
        );

        let visitor = PageVisitor::new(&renderer, Duration::from_secs(5));
        let record = visitor.visit("https://example.com/", 0).await.unwrap();

        assert_eq!(record.url, "https://example.com/");
        assert_eq!(record.title, "Home");
        assert_eq!(record.depth, 0);
        assert_eq!(record.outbound_links.len(), 2);
        // Relative hrefs are resolved against the page URL
        assert_eq!(record.outbound_links[0].url, "https://example.com/about");
        assert!(record.outbound_links[1].nav_origin);
    }

    #[tokio::test]
    async fn test_visit_returns_none_on_http_error() {
        let renderer = MockRenderer::new().with_page(
            "https://example.com/missing",
            404,
            None,
            ExtractedContent::default(),
        );

        let visitor = PageVisitor::new(&renderer, Duration::from_secs(5));
        assert!(visitor.visit("https://example.com/missing", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_visit_returns_none_on_unknown_url() {
        let renderer = MockRenderer::new();
        let visitor = PageVisitor::new(&renderer, Duration::from_secs(5));
        assert!(visitor.visit("https://example.com/nowhere", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_redirect_surfaces_final_url() {
        let renderer = MockRenderer::new().with_page(
            "https://example.com/old",
            200,
            Some("https://www.example.com/new"),
            ExtractedContent::new("Moved", "New home"),
        );

        let visitor = PageVisitor::new(&renderer, Duration::from_secs(5));
        let record = visitor.visit("https://example.com/old", 1).await.unwrap();
        assert_eq!(record.url, "https://www.example.com/new");
    }

    #[tokio::test]
    async fn test_documentation_classification() {
        let renderer = MockRenderer::new()
            .with_page(
                "https://docs.example.com/",
                200,
                None,
                ExtractedContent::new("Docs", "Reference material"),
            )
            .with_page(
                "https://example.com/overview",
                200,
                None,
                ExtractedContent::new("Product Documentation", "All the docs")
                    .with_heading(1, "API Reference"),
            );

        let visitor = PageVisitor::new(&renderer, Duration::from_secs(5));

        let by_url = visitor.visit("https://docs.example.com/", 0).await.unwrap();
        assert!(by_url.is_documentation);

        let by_content = visitor
            .visit("https://example.com/overview", 0)
            .await
            .unwrap();
        assert!(by_content.is_documentation);
    }
}
