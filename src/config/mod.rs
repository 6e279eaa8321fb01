//! Configuration module for Shop-Trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional and falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use shop_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, CrawlerConfig, ExtractionConfig, FetcherConfig, StrategyKind,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
