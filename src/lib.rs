//! Shop-Trawler: a cache-backed product crawler
//!
//! This crate crawls e-commerce sites through a remote render/extract API,
//! shrinks the returned HTML into a compact structural form, and turns product
//! pages into structured [`Product`] records using configurable CSS selectors
//! (or hands the pages to an external extraction agent).

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Shop-Trawler operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Agent error: {0}")]
    Agent(#[from] extract::AgentError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Shop-Trawler operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStore, SqliteCacheStore};
pub use config::Config;
pub use crawler::{Coordinator, Trawler, TrawlOutcome};
pub use extract::{ExtractionStrategy, Product, StructuredExtractor};
pub use fetch::{CachedFetcher, RenderMode};
pub use html::minimize;
