use crate::config::types::{CacheConfig, Config, CrawlerConfig, ExtractionConfig, FetcherConfig, StrategyKind};
use crate::crawler::ClassificationRules;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Longest request timeout accepted (seconds)
const MAX_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_cache_config(&config.cache)?;
    validate_crawler_config(&config.crawler)?;
    validate_classification(&config.classification)?;
    validate_extraction_config(&config.extraction)?;
    Ok(())
}

/// Validates render API configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api-url '{}': {}", config.api_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api-url must use HTTP or HTTPS, got '{}'",
            config.api_url
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.ttl_days < 1 {
        return Err(ConfigError::Validation(format!(
            "ttl-days must be >= 1, got {}",
            config.ttl_days
        )));
    }

    if config.namespace.is_empty() || !config.namespace.ends_with(':') {
        return Err(ConfigError::Validation(format!(
            "namespace must be non-empty and end with ':', got '{}'",
            config.namespace
        )));
    }

    if config.enabled && config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty when the cache is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl bounds
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    validate_selector("crawler.link-selector", &config.link_selector)
}

/// Validates that every classification pattern compiles
fn validate_classification(rules: &ClassificationRules) -> Result<(), ConfigError> {
    rules.compile().map(|_| ())
}

/// Validates extraction configuration
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    for (label, selector) in config.rules.all_selectors() {
        validate_selector(&format!("extraction.{}", label), selector)?;
    }

    if config.strategy == StrategyKind::Agent {
        if let Some(template) = &config.prompt_template {
            if template.as_str().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "prompt-template cannot be empty for the agent strategy".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validates a CSS selector
fn validate_selector(label: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidPattern(format!("{} cannot be empty", label)));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidPattern(format!("Invalid CSS selector for {} '{}': {:?}", label, selector, e))
    })?;

    Ok(())
}
