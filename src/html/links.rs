//! Link discovery for crawled pages
//!
//! Links are pulled from elements matching a selector (by default every
//! element with an `href`), resolved against the page URL, and returned in
//! document order. Duplicates are kept; deduplication is the frontier's job.

use super::query::HtmlDocument;
use url::Url;

/// Selector used when the caller does not supply one
pub const DEFAULT_LINK_SELECTOR: &str = "a[href]";

/// Extracts absolute links from `html`
///
/// # Link Rules
///
/// **Include:** the `href` of every element matching `selector`, resolved
/// against `page_url`.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links (same page anchors)
/// - hrefs that fail to resolve, or resolve to a non-HTTP(S) URL
///
/// Fragments are removed from resolved links.
///
/// # Example
///
/// ```
/// use shop_trawler::html::links_in;
///
/// let html = r#"<a href="/product/1">One</a><a href="mailto:x@y.z">Mail</a>"#;
/// let links = links_in(html, "https://shop.example/catalog", "a[href]");
/// assert_eq!(links, vec!["https://shop.example/product/1"]);
/// ```
pub fn links_in(html: &str, page_url: &str, selector: &str) -> Vec<String> {
    let base_url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot resolve links against '{}': {}", page_url, e);
            return Vec::new();
        }
    };

    HtmlDocument::parse(html)
        .attrs(selector, "href")
        .iter()
        .filter_map(|href| resolve_link(href, &base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded (see [`links_in`]).
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
