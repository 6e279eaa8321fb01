//! Run entry point
//!
//! [`Trawler`] turns a [`Config`] into a fetcher and an extraction strategy,
//! then runs either a frontier crawl or the extraction agent for a seed URL.

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::extract::{
    run_agent, AgentError, AgentOutput, ExtractionAgent, ExtractionStrategy, Product,
    StructuredExtractor,
};
use crate::fetch::CachedFetcher;
use crate::output::CrawlStats;
use crate::TrawlError;
use std::sync::Arc;

/// Result of one run
#[derive(Debug)]
pub enum TrawlOutcome {
    /// Rule-based crawl: products in processing order plus crawl counters
    Products {
        products: Vec<Product>,
        stats: CrawlStats,
    },

    /// Agent run: the agent's answer
    Agent(AgentOutput),
}

/// Configured crawler for one or more seed URLs
pub struct Trawler {
    config: Config,
    fetcher: Arc<CachedFetcher>,
    strategy: ExtractionStrategy,
    agent: Option<Arc<dyn ExtractionAgent>>,
}

impl Trawler {
    /// Builds a trawler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Trawler)` - Ready to run
    /// * `Err(TrawlError)` - The fetcher could not be built (e.g. no API key)
    pub fn from_config(config: &Config) -> Result<Self, TrawlError> {
        let fetcher = CachedFetcher::from_config(config)?;

        Ok(Self {
            config: config.clone(),
            fetcher: Arc::new(fetcher),
            strategy: config.extraction_strategy(),
            agent: None,
        })
    }

    /// Attaches the agent used by the agent strategy
    pub fn with_agent(mut self, agent: Arc<dyn ExtractionAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn fetcher(&self) -> &CachedFetcher {
        &self.fetcher
    }

    pub fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }

    /// Runs the configured strategy for `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(TrawlOutcome)` - Products or agent output
    /// * `Err(TrawlError)` - Invalid seed or classification patterns, or the
    ///   agent failed or is missing
    pub async fn run(&self, seed: &str) -> Result<TrawlOutcome, TrawlError> {
        match &self.strategy {
            ExtractionStrategy::RuleBased(rules) => {
                let classifier = self.config.classification.compile()?;
                let mut coordinator = Coordinator::new(
                    Arc::clone(&self.fetcher),
                    StructuredExtractor::new(rules.clone()),
                    classifier,
                )
                .with_limits(self.config.crawler.max_pages, self.config.crawler.max_depth)
                .with_link_selector(self.config.crawler.link_selector.clone());

                let products = coordinator.run(seed).await?;
                Ok(TrawlOutcome::Products {
                    products,
                    stats: coordinator.stats().clone(),
                })
            }
            ExtractionStrategy::AgentBased(template) => {
                let agent = self.agent.as_ref().ok_or(AgentError::NotConfigured)?;
                let output = run_agent(agent.as_ref(), template, seed, self.fetcher.as_ref()).await?;
                Ok(TrawlOutcome::Agent(output))
            }
        }
    }
}
