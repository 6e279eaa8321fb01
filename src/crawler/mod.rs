//! Crawler module
//!
//! This module contains the crawl-and-extract core, including:
//! - The breadth-first frontier with its visited set and limits
//! - Product page classification
//! - The crawl loop tying fetching, extraction and link discovery together
//! - The run entry point selecting rule-based or agent extraction

mod classify;
mod coordinator;
mod frontier;
mod runner;

pub use classify::{
    ClassificationRules, PageClassifier, DEFAULT_HTML_INDICATORS, DEFAULT_URL_PATTERNS,
};
pub use coordinator::Coordinator;
pub use frontier::{CrawlState, QueuedUrl};
pub use runner::{TrawlOutcome, Trawler};

use crate::config::Config;
use crate::TrawlError;

/// Builds a [`Trawler`] from `config` and runs it for `seed`
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Starting URL
///
/// # Returns
///
/// * `Ok(TrawlOutcome)` - Run completed
/// * `Err(TrawlError)` - Run could not start or the agent failed
pub async fn trawl(config: &Config, seed: &str) -> Result<TrawlOutcome, TrawlError> {
    Trawler::from_config(config)?.run(seed).await
}
