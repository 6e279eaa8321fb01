//! Rule-based product extraction
//!
//! [`StructuredExtractor`] never fails: a selector that matches nothing leaves
//! its field empty, and the worst case is a product carrying only its URL, the
//! placeholder name and the minimized HTML.

use super::product::Product;
use super::rules::{ExtractionRules, SpecPattern};
use crate::html::{element_text, minimize, HtmlDocument};
use scraper::Selector;
use std::collections::HashMap;
use url::Url;

/// Cells read from each specification table row
const TABLE_CELLS: &str = "th, td";

/// Extracts [`Product`] records from page HTML using selector rules
#[derive(Debug, Clone, Default)]
pub struct StructuredExtractor {
    rules: ExtractionRules,
}

impl StructuredExtractor {
    /// Creates an extractor with the given rules
    pub fn new(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    /// The rules in use
    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Extracts a product from one page
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL (used to resolve images and infer the category)
    /// * `html` - Page HTML, raw or already minimized
    ///
    /// # Returns
    ///
    /// The extracted product. `raw_html` holds the minimized input.
    ///
    /// # Example
    ///
    /// ```
    /// use shop_trawler::StructuredExtractor;
    ///
    /// let html = r#"<h1>Mini Drone</h1><meta itemprop="priceCurrency" content="EUR">"#;
    /// let product = StructuredExtractor::default()
    ///     .extract("https://shop.example/drones/mini-drones/x200", html);
    ///
    /// assert_eq!(product.name, "Mini Drone");
    /// assert_eq!(product.currency.as_deref(), Some("EUR"));
    /// assert_eq!(product.category.as_deref(), Some("Mini Drones"));
    /// ```
    pub fn extract(&self, url: &str, html: &str) -> Product {
        let minimized = minimize(html);
        let document = HtmlDocument::parse(&minimized);
        let selectors = &self.rules.selectors;

        let mut product = Product::new(url);

        if let Some(name) = field_text(&document, &selectors.name) {
            product.name = name;
        }
        product.price = field_text(&document, &selectors.price);
        product.description = field_text(&document, &selectors.description);
        product.brand = field_text(&document, &selectors.brand);
        product.availability = field_text(&document, &selectors.availability);
        product.currency = document.attr(&selectors.currency, "content");

        product.images = resolve_images(url, &document.attrs(&selectors.images, "src"));
        product.specifications = self.extract_specifications(&document);
        product.category = self.extract_category(url, &document);
        product.raw_html = Some(minimized);

        tracing::debug!(
            "Extracted '{}' from {} ({} images, {} specs)",
            product.name,
            url,
            product.images.len(),
            product.specifications.len()
        );

        product
    }

    fn extract_specifications(&self, document: &HtmlDocument) -> HashMap<String, String> {
        for pattern in &self.rules.spec_patterns {
            let pairs = match pattern {
                SpecPattern::TableRows { selector } => table_pairs(document, selector),
                SpecPattern::DefinitionList { selector } => definition_pairs(document, selector),
            };

            if !pairs.is_empty() {
                tracing::trace!("Spec pattern '{}' yielded {} pairs", pattern.selector(), pairs.len());
                return pairs.into_iter().collect();
            }
        }

        HashMap::new()
    }

    fn extract_category(&self, url: &str, document: &HtmlDocument) -> Option<String> {
        for selector in &self.rules.breadcrumb_selectors {
            let crumbs = document.texts(selector);
            // The last crumb is usually the product itself
            if crumbs.len() > 1 {
                return Some(crumbs[crumbs.len() - 2].clone());
            }
        }

        category_from_url(url)
    }
}

/// Text of the first match, falling back to its `content` attribute
///
/// Empty text counts as no text, so `meta` tags read through to `content`.
fn field_text(document: &HtmlDocument, selector: &str) -> Option<String> {
    let element = document.first(selector)?;

    let text = element_text(element);
    if !text.is_empty() {
        return Some(text);
    }

    element
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

fn resolve_images(page_url: &str, sources: &[String]) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve images against '{}': {}", page_url, e);
            return Vec::new();
        }
    };

    sources
        .iter()
        .filter_map(|src| base.join(src.trim()).ok())
        .map(String::from)
        .collect()
}

fn table_pairs(document: &HtmlDocument, selector: &str) -> Vec<(String, String)> {
    let cells = match Selector::parse(TABLE_CELLS) {
        Ok(cells) => cells,
        Err(_) => return Vec::new(),
    };

    document
        .select(selector)
        .into_iter()
        .filter_map(|row| {
            let mut row_cells = row.select(&cells).map(element_text);
            let key = row_cells.next()?;
            let value = row_cells.next()?;
            spec_pair(&key, &value)
        })
        .collect()
}

fn definition_pairs(document: &HtmlDocument, selector: &str) -> Vec<(String, String)> {
    document
        .texts(selector)
        .chunks_exact(2)
        .filter_map(|pair| spec_pair(&pair[0], &pair[1]))
        .collect()
}

/// Cleans a key/value pair, dropping it if either side is empty
fn spec_pair(key: &str, value: &str) -> Option<(String, String)> {
    let key = key.trim().trim_end_matches(':').trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Infers a category from the URL path
///
/// Takes the second-to-last non-empty path segment, turns `-` and `_` into
/// spaces and title-cases the result. Paths with fewer than two segments
/// yield `None`.
pub fn category_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() < 2 {
        return None;
    }

    let segment = segments[segments.len() - 2].replace(['-', '_'], " ");
    Some(title_case(&segment))
}

/// Upper-cases the first letter of every run of letters, lower-cases the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }

    out
}
