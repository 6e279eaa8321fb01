use crate::cache::{DEFAULT_NAMESPACE, DEFAULT_TTL_DAYS};
use crate::crawler::ClassificationRules;
use crate::extract::{ExtractionRules, ExtractionStrategy, PromptTemplate};
use crate::fetch::{RenderMode, DEFAULT_API_URL};
use crate::html::DEFAULT_LINK_SELECTOR;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Shop-Trawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub classification: ClassificationRules,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// The extraction strategy selected for this run
    pub fn extraction_strategy(&self) -> ExtractionStrategy {
        match self.extraction.strategy {
            StrategyKind::RuleBased => ExtractionStrategy::RuleBased(self.extraction.rules.clone()),
            StrategyKind::Agent => ExtractionStrategy::AgentBased(
                self.extraction.prompt_template.clone().unwrap_or_default(),
            ),
        }
    }
}

/// Remote render API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Endpoint of the render/extract API
    pub api_url: String,

    /// API key; falls back to the `ZYTE_API_KEY` environment variable
    pub api_key: Option<String>,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Default render mode for crawled pages
    pub render_mode: RenderMode,

    /// Headers passed through to the target site
    pub headers: Option<BTreeMap<String, String>>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            render_mode: RenderMode::Browser,
            headers: None,
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Whether fetched pages are cached at all
    pub enabled: bool,

    /// Path to the SQLite cache file
    pub database_path: String,

    /// How long a cached page stays valid (days)
    pub ttl_days: u64,

    /// Key prefix owned by this crawler
    pub namespace: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: "./page-cache.db".to_string(),
            ttl_days: DEFAULT_TTL_DAYS,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Crawl bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of distinct pages visited
    pub max_pages: usize,

    /// Maximum link depth from the seed URL
    pub max_depth: u32,

    /// Elements whose `href` is followed
    pub link_selector: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            max_depth: 3,
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
        }
    }
}

/// Which extraction strategy a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    RuleBased,
    Agent,
}

/// Extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionConfig {
    pub strategy: StrategyKind,

    /// Selector rules for the rule-based strategy
    #[serde(flatten)]
    pub rules: ExtractionRules,

    /// Agent instructions with a `{url}` placeholder
    pub prompt_template: Option<PromptTemplate>,
}
