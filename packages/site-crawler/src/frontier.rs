//! Crawl frontier: discovered-but-unvisited links ordered by score.
//!
//! The frontier is deduplicated by normalized URL and keeps the best-known
//! score per URL: a score can only increase as more sources reference the
//! same link. Invariant: `queued ∩ visited = ∅`.

use std::collections::{HashMap, HashSet};

use crate::types::ScoredLink;

/// Default bound on queued links, so one link-heavy page cannot grow
/// memory without limit.
pub const DEFAULT_FRONTIER_CAPACITY: usize = 2_000;

/// Priority frontier with depth and capacity bounds.
#[derive(Debug)]
pub struct Frontier {
    queued: HashMap<String, ScoredLink>,
    visited: HashSet<String>,
    max_depth: usize,
    capacity: usize,
}

impl Frontier {
    /// Create a frontier bounded by depth and queue capacity.
    pub fn new(max_depth: usize, capacity: usize) -> Self {
        Self {
            queued: HashMap::new(),
            visited: HashSet::new(),
            max_depth,
            capacity: capacity.max(1),
        }
    }

    /// Insert a scored link, or raise the score of an already-queued one.
    ///
    /// Returns `false` (a no-op) when the URL was already visited, when the
    /// link exceeds the depth bound, when the queue is at capacity, or when
    /// the queued entry already has an equal or better score.
    pub fn insert(&mut self, link: ScoredLink) -> bool {
        if link.depth > self.max_depth {
            return false;
        }

        let url = link.link.url.clone();
        if self.visited.contains(&url) {
            return false;
        }

        match self.queued.get(&url) {
            Some(existing) if existing.score >= link.score => false,
            Some(_) => {
                // Raise: a second source found a stronger signal
                self.queued.insert(url, link);
                true
            }
            None => {
                if self.queued.len() >= self.capacity {
                    tracing::debug!(url = %url, "frontier at capacity, link dropped");
                    return false;
                }
                self.queued.insert(url, link);
                true
            }
        }
    }

    /// Take up to `n` highest-score entries out of the queue.
    ///
    /// Ties break on URL so drains are deterministic.
    pub fn next_batch(&mut self, n: usize) -> Vec<ScoredLink> {
        let mut ranked: Vec<(i32, String)> = self
            .queued
            .iter()
            .map(|(url, link)| (link.score, url.clone()))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        ranked
            .into_iter()
            .take(n)
            .filter_map(|(_, url)| self.queued.remove(&url))
            .collect()
    }

    /// Mark a URL visited, removing any queued entry for it.
    pub fn mark_visited(&mut self, url: &str) {
        self.queued.remove(url);
        self.visited.insert(url.to_string());
    }

    /// Whether a URL has been visited this run.
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of queued links.
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}
