//! Link filtering and priority scoring.
//!
//! Scores are additive and pure: the same link against the same tracker
//! state always scores the same. The constants are a hand-tuned default
//! profile ([`ScoreWeights`]), not a normative set; callers can override
//! them through [`crate::config::CrawlConfig`].

use url::Url;

use crate::domains::DomainTracker;
use crate::types::CandidateLink;

/// Path segments that mark documentation content.
const DOC_PATH_SEGMENTS: &[&str] = &[
    "docs",
    "documentation",
    "guide",
    "guides",
    "developer",
    "developers",
    "api",
    "reference",
    "getting-started",
    "tutorials",
    "help",
    "manual",
    "learn",
    "knowledge",
    "support",
    "wiki",
    "handbook",
    "sdk",
    "faq",
];

/// Hostname prefixes that mark documentation hosts.
const DOC_HOST_PREFIXES: &[&str] = &[
    "docs.",
    "developer.",
    "developers.",
    "api.",
    "help.",
    "support.",
    "wiki.",
    "knowledge.",
];

/// File extensions that never hold crawlable page content.
const BINARY_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".svg", ".webp", ".ico", ".zip", ".mp4", ".css",
    ".js",
];

/// Path fragments for admin and auth surfaces we never crawl.
const EXCLUDED_PATH_PARTS: &[&str] = &[
    "/wp-admin", "/admin", "/login", "/signin", "/signup", "/logout", "/register",
];

/// Scoring profile with all bonus and penalty constants.
///
/// Hand-tuned defaults; override individual fields to bias a crawl.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScoreWeights {
    /// URL matches documentation heuristics
    pub documentation: i32,

    /// Documentation landing/index page, on top of `documentation`
    pub doc_landing: i32,

    /// Path or anchor text mentions "api"
    pub api_mention: i32,

    /// Path or anchor text mentions "sdk" or "developer"
    pub sdk_mention: i32,

    /// Hostname is a verified documentation domain
    pub docs_domain: i32,

    /// Hostname is an accepted related subdomain
    pub related_subdomain: i32,

    /// Link found inside a navigation/menu/sidebar region
    pub nav_origin: i32,

    pub about: i32,
    pub product: i32,
    pub feature: i32,
    pub service: i32,
    pub pricing: i32,
    pub contact: i32,
    pub blog: i32,
    pub privacy: i32,
    pub terms: i32,
    pub legal: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            documentation: 50,
            doc_landing: 30,
            api_mention: 25,
            sdk_mention: 20,
            docs_domain: 40,
            related_subdomain: 5,
            nav_origin: 15,
            about: 10,
            product: 7,
            feature: 8,
            service: 8,
            pricing: 6,
            contact: 5,
            blog: 4,
            privacy: 6,
            terms: 7,
            legal: 9,
        }
    }
}

/// Whether a link may be considered for the frontier at all.
///
/// Fragment links, binary assets, and admin/login paths are rejected before
/// scoring; they must never enter the frontier.
pub fn is_crawlable(url: &str) -> bool {
    if url.contains('#') {
        return false;
    }

    let lower = url.to_lowercase();
    if BINARY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return false;
    }
    if EXCLUDED_PATH_PARTS.iter().any(|part| lower.contains(part)) {
        return false;
    }

    true
}

/// Whether a URL matches documentation heuristics (path or hostname).
pub fn is_documentation_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if let Some(host) = parsed.host_str() {
        if DOC_HOST_PREFIXES.iter().any(|p| host.starts_with(p)) {
            return true;
        }
    }

    path_segments(&parsed)
        .iter()
        .any(|seg| DOC_PATH_SEGMENTS.contains(&seg.as_str()) || is_version_segment(seg))
}

/// Whether a URL looks like a documentation landing/index page rather than
/// a deep article.
pub fn is_documentation_landing(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    let segments = path_segments(&parsed);

    let doc_host = parsed
        .host_str()
        .is_some_and(|host| DOC_HOST_PREFIXES.iter().any(|p| host.starts_with(p)));
    if doc_host && segments.len() <= 1 {
        return true;
    }

    segments.len() <= 2
        && segments.last().is_some_and(|seg| {
            matches!(
                seg.as_str(),
                "docs" | "documentation" | "reference" | "getting-started"
            )
        })
}

/// Score a candidate link against the current tracker state.
///
/// Pure and additive. Documentation links are exempt from the depth
/// penalty so deep reference pages still outrank shallow marketing pages.
pub fn score(link: &CandidateLink, tracker: &DomainTracker, weights: &ScoreWeights) -> i32 {
    let mut score = 0;

    let text = link.anchor_text.to_lowercase();
    let parsed = Url::parse(&link.url).ok();
    let path = parsed
        .as_ref()
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();
    let host = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or_default()
        .to_string();

    let is_doc = is_documentation_url(&link.url);
    if is_doc {
        score += weights.documentation;
        if is_documentation_landing(&link.url) {
            score += weights.doc_landing;
        }
    }
    if path.contains("api") || text.contains("api") {
        score += weights.api_mention;
    }
    if path.contains("sdk")
        || text.contains("sdk")
        || path.contains("developer")
        || text.contains("developer")
    {
        score += weights.sdk_mention;
    }

    if tracker.is_docs_domain(&host) {
        score += weights.docs_domain;
    }
    if tracker.is_related_subdomain(&host) {
        score += weights.related_subdomain;
    }

    score += topic_bonus(&path, &text, weights);

    if link.nav_origin {
        score += weights.nav_origin;
    }

    if !is_doc {
        if let Some(parsed) = &parsed {
            score -= path_segments(parsed).len() as i32;
        }
    }

    score
}

fn topic_bonus(path: &str, text: &str, weights: &ScoreWeights) -> i32 {
    let mentions = |needles: &[&str]| {
        needles
            .iter()
            .any(|needle| path.contains(needle) || text.contains(needle))
    };

    let mut bonus = 0;
    if mentions(&["about", "company", "team"]) {
        bonus += weights.about;
    }
    if mentions(&["product"]) {
        bonus += weights.product;
    }
    if mentions(&["feature"]) {
        bonus += weights.feature;
    }
    if mentions(&["service"]) {
        bonus += weights.service;
    }
    if mentions(&["pricing", "plans"]) {
        bonus += weights.pricing;
    }
    if mentions(&["contact"]) {
        bonus += weights.contact;
    }
    if mentions(&["blog", "news"]) {
        bonus += weights.blog;
    }
    if mentions(&["privacy"]) {
        bonus += weights.privacy;
    }
    if mentions(&["terms"]) {
        bonus += weights.terms;
    }
    if mentions(&["legal"]) {
        bonus += weights.legal;
    }
    bonus
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() >= 2
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

fn path_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| {
            segments
                .filter(|seg| !seg.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default()
}
