//! Crawler coordinator - main crawl loop
//!
//! The loop is strictly sequential: each URL is fetched, classified,
//! extracted and scanned for links before the next one is dequeued.
//!
//! - Fetch failures are logged and count against the page budget
//! - Product pages go through the structured extractor
//! - Links come from the HTML already fetched for the page

use crate::crawler::classify::PageClassifier;
use crate::crawler::frontier::{CrawlState, QueuedUrl};
use crate::extract::{Product, StructuredExtractor};
use crate::fetch::{CachedFetcher, FetchOptions};
use crate::html::{links_in, DEFAULT_LINK_SELECTOR};
use crate::output::CrawlStats;
use crate::UrlResult;
use std::sync::Arc;
use std::time::Instant;

/// Runs breadth-first crawls and collects products
pub struct Coordinator {
    fetcher: Arc<CachedFetcher>,
    extractor: StructuredExtractor,
    classifier: PageClassifier,
    options: FetchOptions,
    link_selector: String,
    max_pages: usize,
    max_depth: u32,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator
    ///
    /// Fetch options default to the fetcher's own; limits default to 100
    /// pages and depth 3.
    pub fn new(
        fetcher: Arc<CachedFetcher>,
        extractor: StructuredExtractor,
        classifier: PageClassifier,
    ) -> Self {
        let options = fetcher.options();
        Self {
            fetcher,
            extractor,
            classifier,
            options,
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            max_pages: 100,
            max_depth: 3,
            stats: CrawlStats::default(),
        }
    }

    /// Sets the page budget and the depth limit
    pub fn with_limits(mut self, max_pages: usize, max_depth: u32) -> Self {
        self.max_pages = max_pages;
        self.max_depth = max_depth;
        self
    }

    /// Sets the selector used to find links
    pub fn with_link_selector(mut self, selector: impl Into<String>) -> Self {
        self.link_selector = selector.into();
        self
    }

    /// Sets the options used for every page fetch
    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Statistics of the most recent crawl
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Crawls from `seed` and returns the products found
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Product>)` - Products in the order their pages were processed
    /// * `Err(UrlError)` - The seed URL is invalid
    pub async fn run(&mut self, seed: &str) -> UrlResult<Vec<Product>> {
        let mut state = CrawlState::new(seed, self.max_pages, self.max_depth)?;
        self.stats = CrawlStats::default();

        tracing::info!(
            "Starting crawl of {} (max {} pages, max depth {}, {} mode)",
            seed,
            self.max_pages,
            self.max_depth,
            self.options.mode
        );

        let start_time = Instant::now();
        let mut products = Vec::new();

        while let Some(queued) = state.next_url() {
            self.stats.pages_visited += 1;

            if let Some(product) = self.process_url(&mut state, &queued).await {
                tracing::info!("Extracted product: {}", product.name);
                products.push(product);
            }

            if self.stats.pages_visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} queued, {} products",
                    self.stats.pages_visited,
                    state.queued_count(),
                    products.len()
                );
            }
        }

        self.stats.elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl of {} complete: {} pages visited, {} products in {:.1}s",
            seed,
            self.stats.pages_visited,
            products.len(),
            self.stats.elapsed.as_secs_f64()
        );

        Ok(products)
    }

    /// Fetches, classifies, extracts and expands one page
    async fn process_url(&mut self, state: &mut CrawlState, queued: &QueuedUrl) -> Option<Product> {
        tracing::debug!("Processing {} (depth {})", queued.url, queued.depth);

        let html = match self.fetcher.fetch(&queued.url, &self.options).await {
            Some(html) => html,
            None => {
                self.stats.fetch_failures += 1;
                tracing::warn!("No content for {}, skipping", queued.url);
                return None;
            }
        };

        let product = if self.classifier.is_product_page(&queued.url, &html) {
            self.stats.product_pages += 1;
            Some(self.extractor.extract(&queued.url, &html))
        } else {
            None
        };

        if state.can_expand(queued.depth) {
            let links = links_in(&html, &queued.url, &self.link_selector);
            let found = links.len();
            let enqueued = state.enqueue_links(links, queued.depth);
            self.stats.links_enqueued += enqueued;
            tracing::debug!("{}: {} links found, {} queued", queued.url, found, enqueued);
        }

        product
    }
}
