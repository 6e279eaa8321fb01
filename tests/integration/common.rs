//! Shared fixtures for the integration tests

use serde_json::json;
use shop_trawler::config::Config;
use std::path::Path;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock render API listens on
pub const API_PATH: &str = "/v1/extract";

/// API key used by every test configuration
pub const API_KEY: &str = "test-key";

/// `Authorization` header for [`API_KEY`] with an empty password
pub const AUTH_HEADER: &str = "Basic dGVzdC1rZXk6";

/// Creates a test configuration pointing at the mock API
///
/// With `cache_path` the SQLite cache lives there; without it caching is off.
pub fn test_config(server: &MockServer, cache_path: Option<&Path>) -> Config {
    let mut config = Config::default();
    config.fetcher.api_url = format!("{}{}", server.uri(), API_PATH);
    config.fetcher.api_key = Some(API_KEY.to_string());
    config.fetcher.timeout_secs = 5;

    match cache_path {
        Some(path) => config.cache.database_path = path.display().to_string(),
        None => config.cache.enabled = false,
    }

    config
}

/// Mounts a browser-mode page on the mock API
pub async fn mount_page(server: &MockServer, url: &str, html: &str) {
    page_mock(url, html).mount(server).await;
}

/// A browser-mode page mock, for tests that set call expectations
pub fn page_mock(url: &str, html: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(header("authorization", AUTH_HEADER))
        .and(body_partial_json(json!({"url": url, "browserHtml": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": url,
            "statusCode": 200,
            "browserHtml": html,
        })))
}

/// A plain HTTP-mode page mock
pub fn http_page_mock(url: &str, html: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({"url": url, "httpResponseBody": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": url,
            "statusCode": 200,
            "httpResponseBody": html,
        })))
}

/// A product page with microdata the default rules read
pub fn product_html(name: &str, price: &str) -> String {
    format!(
        r#"<html><head>
            <meta itemprop="price" content="{price}">
            <meta itemprop="priceCurrency" content="USD">
            <meta name="description" content="The {name}">
        </head><body>
            <div class="product-detail"><h1>{name}</h1></div>
            <img src="/img/{name}.jpg">
            <table><tr><th>Weight:</th><td>2kg</td></tr></table>
        </body></html>"#
    )
}

/// A listing page linking to `hrefs`
pub fn listing_html(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">{href}</a></li>"#))
        .collect();
    format!("<html><body><h2>Catalog</h2><ul>{links}</ul></body></html>")
}
