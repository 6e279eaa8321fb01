//! Read-only selector accessors over HTML
//!
//! All lookups return empty results rather than errors: a selector that does
//! not parse, or that matches nothing, yields `None` or an empty vector.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document that can be queried repeatedly
pub struct HtmlDocument {
    document: Html,
}

impl HtmlDocument {
    /// Parses an HTML string
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns all elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(selector) {
            Ok(parsed) => self.document.select(&parsed).collect(),
            Err(e) => {
                tracing::debug!("Ignoring invalid selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    /// Returns the first element matching `selector`
    pub fn first<'a>(&'a self, selector: &str) -> Option<ElementRef<'a>> {
        let parsed = Selector::parse(selector).ok()?;
        self.document.select(&parsed).next()
    }

    /// Text of the first matching element, trimmed
    pub fn text(&self, selector: &str) -> Option<String> {
        self.first(selector).map(element_text)
    }

    /// Text of every matching element, trimmed, in document order
    pub fn texts(&self, selector: &str) -> Vec<String> {
        self.select(selector).into_iter().map(element_text).collect()
    }

    /// Value of `attribute` on the first matching element
    ///
    /// Returns `None` when nothing matches or the first match lacks the attribute.
    pub fn attr(&self, selector: &str, attribute: &str) -> Option<String> {
        self.first(selector)
            .and_then(|element| element.value().attr(attribute))
            .map(str::to_string)
    }

    /// Values of `attribute` on every matching element that carries it
    pub fn attrs(&self, selector: &str, attribute: &str) -> Vec<String> {
        self.select(selector)
            .into_iter()
            .filter_map(|element| element.value().attr(attribute))
            .map(str::to_string)
            .collect()
    }
}

/// Collects the text content of an element and trims it
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matching `selector`
///
/// # Example
///
/// ```
/// use shop_trawler::html::select_text;
///
/// let html = "<h1> Mini Drone X200 </h1>";
/// assert_eq!(select_text(html, "h1"), Some("Mini Drone X200".to_string()));
/// assert_eq!(select_text(html, "h2"), None);
/// ```
pub fn select_text(html: &str, selector: &str) -> Option<String> {
    HtmlDocument::parse(html).text(selector)
}

/// Text of every element matching `selector`
pub fn select_texts(html: &str, selector: &str) -> Vec<String> {
    HtmlDocument::parse(html).texts(selector)
}

/// Value of `attribute` on the first element matching `selector`
pub fn select_attr(html: &str, selector: &str, attribute: &str) -> Option<String> {
    HtmlDocument::parse(html).attr(selector, attribute)
}

/// Values of `attribute` on every element matching `selector`
pub fn select_attrs(html: &str, selector: &str, attribute: &str) -> Vec<String> {
    HtmlDocument::parse(html).attrs(selector, attribute)
}
