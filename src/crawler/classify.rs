//! Product page classification
//!
//! A page is a product page if its URL matches any URL pattern, or its markup
//! matches any HTML indicator. Both lists are configuration data and are
//! matched case-insensitively.

use crate::ConfigError;
use regex::{RegexSet, RegexSetBuilder};
use serde::Deserialize;

/// URL path patterns that mark a product page
pub const DEFAULT_URL_PATTERNS: &[&str] = &[r"/product[s]?/", r"/item/", r"/p/", r"/pd/", r"/detail/"];

/// Markup signals that mark a product page
pub const DEFAULT_HTML_INDICATORS: &[&str] = &[
    r#"<[^>]*itemprop=["']price["']"#,
    r#"<[^>]*itemprop=["']product["']"#,
    r#"<[^>]*class=["'].*product.*["']"#,
    r#"<[^>]*id=["']product["']"#,
    r#"<[^>]*class=["'].*add-to-cart.*["']"#,
    r#"<[^>]*class=["'].*buy-now.*["']"#,
];

/// Classification patterns as written in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClassificationRules {
    /// Regexes matched against the page URL
    pub url_patterns: Vec<String>,

    /// Regexes matched against the page markup
    pub html_indicators: Vec<String>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            url_patterns: DEFAULT_URL_PATTERNS.iter().map(|p| p.to_string()).collect(),
            html_indicators: DEFAULT_HTML_INDICATORS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ClassificationRules {
    /// Compiles the patterns into a classifier
    ///
    /// # Returns
    ///
    /// * `Ok(PageClassifier)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern is not a valid regex
    pub fn compile(&self) -> Result<PageClassifier, ConfigError> {
        Ok(PageClassifier {
            url_patterns: build_set("url-patterns", &self.url_patterns)?,
            html_indicators: build_set("html-indicators", &self.html_indicators)?,
        })
    }
}

fn build_set(label: &str, patterns: &[String]) -> Result<RegexSet, ConfigError> {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern(format!("Invalid classification {}: {}", label, e)))
}

/// Decides whether a fetched page is a product page
#[derive(Debug, Clone)]
pub struct PageClassifier {
    url_patterns: RegexSet,
    html_indicators: RegexSet,
}

impl PageClassifier {
    /// Returns true if the URL or the markup marks a product page
    pub fn is_product_page(&self, url: &str, html: &str) -> bool {
        if self.url_patterns.is_match(url) {
            tracing::trace!("{} classified as product by URL", url);
            return true;
        }

        if self.html_indicators.is_match(html) {
            tracing::trace!("{} classified as product by markup", url);
            return true;
        }

        false
    }
}
