use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name given to a product whose name selector matched nothing
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// One product extracted from a product page
///
/// Serializes to a flat JSON object; `images` becomes an array of strings and
/// `specifications` an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Page the product was extracted from
    pub url: String,

    /// Product name, or [`UNKNOWN_PRODUCT_NAME`]
    pub name: String,

    pub description: Option<String>,

    pub price: Option<String>,

    pub currency: Option<String>,

    /// Absolute image URLs, in page order
    #[serde(default)]
    pub images: Vec<String>,

    /// Specification table, key to value
    #[serde(default)]
    pub specifications: HashMap<String, String>,

    pub availability: Option<String>,

    pub brand: Option<String>,

    pub category: Option<String>,

    /// Minimized page HTML the product was read from
    pub raw_html: Option<String>,
}

impl Product {
    /// Creates an empty product for `url` carrying the placeholder name
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: UNKNOWN_PRODUCT_NAME.to_string(),
            description: None,
            price: None,
            currency: None,
            images: Vec::new(),
            specifications: HashMap::new(),
            availability: None,
            brand: None,
            category: None,
            raw_html: None,
        }
    }

    /// Returns true if no name could be extracted
    pub fn is_unnamed(&self) -> bool {
        self.name == UNKNOWN_PRODUCT_NAME
    }
}
