//! Breadth-first crawl frontier
//!
//! [`CrawlState`] owns the FIFO queue of (URL, depth) pairs and the visited
//! set for one crawl. Deduplication happens when a URL is dequeued, not when
//! it is enqueued, so the same link may sit in the queue several times; only
//! its first dequeue counts against the page budget.

use crate::url::{extract_domain, parse_http_url, same_domain};
use crate::{UrlError, UrlResult};
use std::collections::{HashSet, VecDeque};

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Absolute URL to fetch
    pub url: String,

    /// Link distance from the seed (the seed is depth 0)
    pub depth: u32,
}

/// Frontier and visited set for one crawl
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    frontier: VecDeque<QueuedUrl>,
    max_pages: usize,
    max_depth: u32,
    base_domain: String,
}

impl CrawlState {
    /// Creates the state for a crawl starting at `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - Starting URL (queued at depth 0)
    /// * `max_pages` - Maximum number of distinct URLs to visit
    /// * `max_depth` - Maximum link depth to queue
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlState)` - State with the seed queued
    /// * `Err(UrlError)` - The seed is not an HTTP(S) URL with a host
    pub fn new(seed: &str, max_pages: usize, max_depth: u32) -> UrlResult<Self> {
        let seed_url = parse_http_url(seed)?;
        let base_domain = extract_domain(&seed_url).ok_or(UrlError::MissingDomain)?;

        let mut frontier = VecDeque::new();
        frontier.push_back(QueuedUrl {
            url: seed_url.to_string(),
            depth: 0,
        });

        Ok(Self {
            visited: HashSet::new(),
            frontier,
            max_pages,
            max_depth,
            base_domain,
        })
    }

    /// Dequeues the next URL to visit and marks it visited
    ///
    /// Already-visited URLs are dropped without using budget. Returns `None`
    /// once the queue is empty or `max_pages` URLs have been visited.
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        while self.visited.len() < self.max_pages {
            let queued = self.frontier.pop_front()?;

            if self.visited.contains(&queued.url) {
                tracing::debug!("Skipping already visited {}", queued.url);
                continue;
            }

            self.visited.insert(queued.url.clone());
            return Some(queued);
        }

        None
    }

    /// Returns true if links found at `depth` may still be followed
    pub fn can_expand(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    /// Queues links discovered on a page at `parent_depth`
    ///
    /// Links on another host, or already visited, are dropped. Duplicates
    /// within `links` are queued as-is.
    ///
    /// # Returns
    ///
    /// The number of links queued
    pub fn enqueue_links<I>(&mut self, links: I, parent_depth: u32) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        if !self.can_expand(parent_depth) {
            return 0;
        }

        let depth = parent_depth + 1;
        let mut queued = 0;

        for link in links {
            if !same_domain(&link, &self.base_domain) {
                tracing::debug!("Ignoring off-site link {}", link);
                continue;
            }
            if self.visited.contains(&link) {
                continue;
            }

            self.frontier.push_back(QueuedUrl { url: link, depth });
            queued += 1;
        }

        queued
    }

    /// Host every queued URL must share
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of entries waiting in the queue (duplicates included)
    pub fn queued_count(&self) -> usize {
        self.frontier.len()
    }
}
