//! Selector rules for product extraction
//!
//! Rules run against minimized HTML, where only `src`, `href` and `title`
//! survive on ordinary elements and `meta` keeps all of its attributes. The
//! defaults therefore read microdata from `meta` tags and structure from tag
//! names rather than from classes.

use serde::{Deserialize, Serialize};

/// Per-field selectors
///
/// Any field left out of the configuration keeps its default. Text fields
/// (name, price, description, brand, availability) take the text of the
/// first match; when that text is empty the match's `content` attribute is
/// used instead, which is how the `meta` defaults are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorMap {
    pub name: String,
    pub price: String,
    /// Read from the `content` attribute only
    pub currency: String,
    pub description: String,
    /// Read from the `src` attribute of every match
    pub images: String,
    pub brand: String,
    pub availability: String,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            name: "h1".to_string(),
            price: "meta[itemprop='price']".to_string(),
            currency: "meta[itemprop='priceCurrency']".to_string(),
            description: "meta[itemprop='description'], meta[name='description']".to_string(),
            images: "img[src]".to_string(),
            brand: "meta[itemprop='brand']".to_string(),
            availability: "meta[itemprop='availability']".to_string(),
        }
    }
}

impl SelectorMap {
    /// Every selector with the field it belongs to
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("price", self.price.as_str()),
            ("currency", self.currency.as_str()),
            ("description", self.description.as_str()),
            ("images", self.images.as_str()),
            ("brand", self.brand.as_str()),
            ("availability", self.availability.as_str()),
        ]
    }
}

/// A structural pattern that yields specification key/value pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpecPattern {
    /// Rows with two or more `th`/`td` cells: first cell is the key, second the value
    TableRows { selector: String },

    /// Matches consumed two at a time as (term, definition)
    DefinitionList { selector: String },
}

impl SpecPattern {
    pub fn selector(&self) -> &str {
        match self {
            SpecPattern::TableRows { selector } | SpecPattern::DefinitionList { selector } => {
                selector
            }
        }
    }
}

/// Everything the rule-based extractor needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionRules {
    pub selectors: SelectorMap,

    /// Tried in order; the first pattern yielding any pair wins
    pub spec_patterns: Vec<SpecPattern>,

    /// Tried in order; the first selector yielding more than one item wins
    pub breadcrumb_selectors: Vec<String>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            selectors: SelectorMap::default(),
            spec_patterns: vec![
                SpecPattern::TableRows {
                    selector: "table tr".to_string(),
                },
                SpecPattern::DefinitionList {
                    selector: "dl dt, dl dd".to_string(),
                },
            ],
            breadcrumb_selectors: vec!["nav ol li".to_string(), "nav ul li".to_string()],
        }
    }
}

impl ExtractionRules {
    /// Every selector in the rules, labelled for error messages
    pub fn all_selectors(&self) -> Vec<(String, &str)> {
        let mut all: Vec<(String, &str)> = self
            .selectors
            .entries()
            .into_iter()
            .map(|(field, selector)| (format!("selectors.{}", field), selector))
            .collect();

        for (i, pattern) in self.spec_patterns.iter().enumerate() {
            all.push((format!("spec-patterns[{}]", i), pattern.selector()));
        }
        for (i, selector) in self.breadcrumb_selectors.iter().enumerate() {
            all.push((format!("breadcrumb-selectors[{}]", i), selector.as_str()));
        }

        all
    }
}
