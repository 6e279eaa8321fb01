use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// Scheme, port, path, query and fragment play no part in the result.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shop_trawler::url::extract_domain;
///
/// let url = Url::parse("https://SHOP.example:8443/path?q=1").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.example".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses `url` and extracts its domain, returning `None` for unparseable input
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(extract_domain)
}

/// Returns true if `url` lives on `domain` (compared case-insensitively)
pub fn same_domain(url: &str, domain: &str) -> bool {
    domain_of(url).is_some_and(|d| d.eq_ignore_ascii_case(domain))
}
