//! Product extraction
//!
//! Two strategies are available, chosen once per run:
//! - Rule-based: CSS selector rules applied by [`StructuredExtractor`]
//! - Agent-based: an external [`ExtractionAgent`] driven by a prompt template

mod agent;
mod extractor;
mod product;
mod rules;

pub use agent::{
    run_agent, AgentError, AgentOutput, ExtractionAgent, PageSource, PromptTemplate,
    DEFAULT_PROMPT_TEMPLATE, URL_PLACEHOLDER,
};
pub use extractor::{category_from_url, StructuredExtractor};
pub use product::{Product, UNKNOWN_PRODUCT_NAME};
pub use rules::{ExtractionRules, SelectorMap, SpecPattern};

/// How products are extracted during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Crawl the site and apply selector rules to every product page
    RuleBased(ExtractionRules),

    /// Hand the seed URL to an agent with these instructions
    AgentBased(PromptTemplate),
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        ExtractionStrategy::RuleBased(ExtractionRules::default())
    }
}
