//! Domain equivalence tracking.
//!
//! Classifies hostnames as same-site, related, or documentation-bearing so
//! the crawl stays on the company's web presence. Official doc/API
//! subdomains must always be crawlable regardless of discovery order;
//! unrelated subdomains are excluded to bound crawl size.
//!
//! Classification is split into a pure [`DomainTracker::classify`] and an
//! explicit [`DomainTracker::record`] mutation, invoked together by the
//! orchestrator.

use std::collections::HashSet;

use url::Url;

use crate::error::CrawlError;
use crate::scoring;

/// Hostname prefixes that mark an official documentation subdomain.
const DOC_HOST_PREFIXES: &[&str] = &["docs.", "developer.", "developers.", "api."];

/// Hostname substrings that suggest a help/learning subdomain.
const DOC_HOST_HINTS: &[&str] = &["help", "support", "learn", "doc"];

/// Second-level labels that form a multi-part public suffix with a
/// two-letter TLD (e.g. `example.co.uk`).
const MULTI_PART_SUFFIXES: &[&str] = &["co", "com", "org", "net", "gov"];

/// How a hostname relates to the crawl's root domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    /// Same site as the seed (root domain, www, or a redirect variant)
    SameSite,

    /// A subdomain already accepted as part of the web presence
    Related,

    /// A documentation-bearing subdomain (docs., developer., api., ...)
    Documentation,

    /// Outside the crawl scope
    Unrelated,
}

impl DomainClass {
    /// Whether a link with this classification may enter the frontier.
    pub fn is_related(self) -> bool {
        !matches!(self, DomainClass::Unrelated)
    }
}

/// Tracks which hostnames belong to the crawled web presence.
///
/// One instance per crawl run; mutated by redirect discovery and by
/// recording classification results.
#[derive(Debug, Clone)]
pub struct DomainTracker {
    root_domain: String,
    seed_host: String,
    variants: HashSet<String>,
    related_subdomains: HashSet<String>,
    docs_domains: HashSet<String>,
}

impl DomainTracker {
    /// Initialize a tracker from the seed URL.
    pub fn new(seed_url: &str) -> Result<Self, CrawlError> {
        let host = Url::parse(seed_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| CrawlError::InvalidSeed {
                url: seed_url.to_string(),
            })?;

        let root_domain = registrable_domain(&host);
        let mut variants = HashSet::new();
        variants.insert(host.clone());

        Ok(Self {
            root_domain,
            seed_host: host,
            variants,
            related_subdomains: HashSet::new(),
            docs_domains: HashSet::new(),
        })
    }

    /// The registrable root domain (e.g. `example.com`, `example.co.uk`).
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Classify a URL's hostname. Pure: records nothing.
    ///
    /// First match wins. Parse failures classify as [`DomainClass::Unrelated`];
    /// a malformed link must never abort the crawl.
    pub fn classify(&self, url: &str) -> DomainClass {
        let host = match host_of(url) {
            Some(host) => host,
            None => return DomainClass::Unrelated,
        };

        if self.variants.contains(&host) {
            return DomainClass::SameSite;
        }
        if self.related_subdomains.contains(&host) {
            return DomainClass::Related;
        }
        if DOC_HOST_PREFIXES.iter().any(|p| host.starts_with(p))
            && self.is_same_or_subdomain(&host)
        {
            return DomainClass::Documentation;
        }
        if self.is_same_or_subdomain(&host)
            && (scoring::is_documentation_url(url)
                || DOC_HOST_HINTS.iter().any(|hint| host.contains(hint)))
        {
            return DomainClass::Documentation;
        }

        DomainClass::Unrelated
    }

    /// Record a classification's side effects.
    ///
    /// Documentation hosts are promoted into both the docs set and the
    /// related set, so they stay crawlable however they were discovered.
    pub fn record(&mut self, url: &str, class: DomainClass) {
        if class != DomainClass::Documentation {
            return;
        }
        if let Some(host) = host_of(url) {
            tracing::debug!(host = %host, "promoting documentation subdomain");
            self.docs_domains.insert(host.clone());
            self.related_subdomains.insert(host);
        }
    }

    /// Classify and record in one step.
    pub fn is_related(&mut self, url: &str) -> bool {
        let class = self.classify(url);
        self.record(url, class);
        class.is_related()
    }

    /// Register a hostname discovered through a redirect.
    pub fn add_domain(&mut self, url: &str) {
        let host = match host_of(url) {
            Some(host) => host,
            None => return,
        };

        if host == self.root_domain
            || host == format!("www.{}", self.root_domain)
            || host == self.seed_host
        {
            self.variants.insert(host);
        } else if self.is_same_or_subdomain(&host) {
            if scoring::is_documentation_url(url) {
                self.docs_domains.insert(host.clone());
            }
            self.related_subdomains.insert(host);
        }
    }

    /// Whether a hostname is a verified documentation domain.
    pub fn is_docs_domain(&self, host: &str) -> bool {
        self.docs_domains.contains(host)
    }

    /// Whether a hostname is an accepted related subdomain.
    pub fn is_related_subdomain(&self, host: &str) -> bool {
        self.related_subdomains.contains(host)
    }

    fn is_same_or_subdomain(&self, host: &str) -> bool {
        host == self.root_domain || host.ends_with(&format!(".{}", self.root_domain))
    }
}

/// Compute the registrable domain by keeping the last two labels, or three
/// when the second-to-last label is a multi-part suffix before a two-letter
/// TLD (`example.co.uk`).
fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host.to_string();
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && MULTI_PART_SUFFIXES.contains(&second) {
        3
    } else {
        2
    };

    labels[labels.len() - keep.min(labels.len())..].join(".")
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_domain_strips_leading_label() {
        let tracker = DomainTracker::new("https://www.example.com").unwrap();
        assert_eq!(tracker.root_domain(), "example.com");
    }

    #[test]
    fn test_root_domain_keeps_multi_part_suffix() {
        let tracker = DomainTracker::new("https://example.co.uk").unwrap();
        assert_eq!(tracker.root_domain(), "example.co.uk");

        let tracker = DomainTracker::new("https://shop.example.co.uk").unwrap();
        assert_eq!(tracker.root_domain(), "example.co.uk");
    }

    #[test]
    fn test_seed_host_is_same_site() {
        let tracker = DomainTracker::new("https://example.com").unwrap();
        assert_eq!(
            tracker.classify("https://example.com/about"),
            DomainClass::SameSite
        );
    }

    #[test]
    fn test_docs_subdomain_is_promoted() {
        let mut tracker = DomainTracker::new("https://example.com").unwrap();

        assert!(tracker.is_related("https://docs.example.com/x"));
        assert!(tracker.is_docs_domain("docs.example.com"));
        assert!(tracker.is_related_subdomain("docs.example.com"));

        // Once promoted, the host classifies as Related on later lookups
        assert_eq!(
            tracker.classify("https://docs.example.com/other"),
            DomainClass::Related
        );
    }

    #[test]
    fn test_doc_prefix_on_foreign_domain_is_unrelated() {
        let tracker = DomainTracker::new("https://example.com").unwrap();
        assert_eq!(
            tracker.classify("https://docs.other.com/x"),
            DomainClass::Unrelated
        );
        // Label boundary matters: notexample.com is not a subdomain
        assert_eq!(
            tracker.classify("https://docs.notexample.com/x"),
            DomainClass::Unrelated
        );
    }

    #[test]
    fn test_help_subdomain_is_documentation() {
        let tracker = DomainTracker::new("https://example.com").unwrap();
        assert_eq!(
            tracker.classify("https://helpcenter.example.com/article"),
            DomainClass::Documentation
        );
    }

    #[test]
    fn test_unrelated_subdomain_is_excluded() {
        let tracker = DomainTracker::new("https://example.com").unwrap();
        assert_eq!(
            tracker.classify("https://status.example.com/"),
            DomainClass::Unrelated
        );
    }

    #[test]
    fn test_add_domain_on_redirect() {
        let mut tracker = DomainTracker::new("https://example.com").unwrap();

        tracker.add_domain("https://www.example.com/");
        assert_eq!(
            tracker.classify("https://www.example.com/about"),
            DomainClass::SameSite
        );

        tracker.add_domain("https://app.example.com/");
        assert!(tracker.is_related_subdomain("app.example.com"));

        tracker.add_domain("https://developer.example.com/docs");
        assert!(tracker.is_docs_domain("developer.example.com"));
    }

    #[test]
    fn test_malformed_urls_never_fail() {
        let mut tracker = DomainTracker::new("https://example.com").unwrap();
        assert_eq!(tracker.classify("::garbage::"), DomainClass::Unrelated);
        assert!(!tracker.is_related("not a url"));
        tracker.add_domain("also not a url"); // no panic
    }

    #[test]
    fn test_invalid_seed_is_an_error() {
        assert!(DomainTracker::new("::garbage::").is_err());
    }
}
