//! Crawl statistics
//!
//! Counters collected by the coordinator while a crawl runs, and a formatted
//! printout for the command line.

use std::time::Duration;

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Distinct URLs dequeued (counts against the page budget)
    pub pages_visited: usize,

    /// Visited pages whose fetch returned nothing
    pub fetch_failures: usize,

    /// Pages classified as product pages
    pub product_pages: usize,

    /// Links added to the frontier
    pub links_enqueued: usize,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Pages visited per second of crawl time
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_visited as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_crawl_stats(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Product pages: {}", stats.product_pages);
    println!("  Links queued: {}", stats.links_enqueued);
    println!();

    let success_rate = if stats.pages_visited > 0 {
        let fetched = stats.pages_visited - stats.fetch_failures;
        (fetched as f64 / stats.pages_visited as f64) * 100.0
    } else {
        0.0
    };
    println!("Fetch success rate: {:.1}%", success_rate);
    println!(
        "Duration: {:.1}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_sec()
    );
}
