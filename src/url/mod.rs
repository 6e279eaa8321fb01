//! URL handling module for Shop-Trawler
//!
//! This module provides seed URL validation and the host comparison used to
//! keep a crawl on its starting site.

mod domain;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{domain_of, extract_domain, same_domain};

/// Parses a URL and requires an HTTP(S) scheme with a host
///
/// # Examples
///
/// ```
/// use shop_trawler::url::parse_http_url;
///
/// let url = parse_http_url("https://shop.example/catalog").unwrap();
/// assert_eq!(url.host_str(), Some("shop.example"));
/// assert!(parse_http_url("ftp://shop.example/").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
