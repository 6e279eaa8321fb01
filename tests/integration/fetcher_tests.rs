//! Cached fetcher tests against a mock render API

use crate::common::{http_page_mock, mount_page, page_mock, test_config, API_PATH};
use serde_json::json;
use shop_trawler::fetch::{CacheScope, CachedFetcher, ExtractApiClient, FetchError, RenderMode};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_URL: &str = "https://shop.example/product/1";

fn cached_fetcher(server: &MockServer, dir: &tempfile::TempDir) -> CachedFetcher {
    let config = test_config(server, Some(&dir.path().join("cache.db")));
    CachedFetcher::from_config(&config).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_minimizes_content() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        PAGE_URL,
        r#"<div class="x"><script>track()</script><span>Drone</span></div>"#,
    )
    .await;

    let config = test_config(&mock_server, None);
    let fetcher = CachedFetcher::from_config(&config).unwrap();
    assert!(!fetcher.cache_enabled());

    let html = fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    assert_eq!(html, "<html><head></head><body><d><s>Drone</s></d></body></html>");
}

#[tokio::test]
async fn test_second_fetch_served_from_cache() {
    let mock_server = MockServer::start().await;
    page_mock(PAGE_URL, "<h1>Drone</h1>")
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = cached_fetcher(&mock_server, &dir);
    assert!(fetcher.cache_enabled());

    let first = fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    let second = fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    assert_eq!(first, second);
    assert!(first.contains("<h1>Drone</h1>"));
}

#[tokio::test]
async fn test_cache_survives_new_fetcher() {
    let mock_server = MockServer::start().await;
    page_mock(PAGE_URL, "<h1>Drone</h1>")
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let first = {
        let fetcher = cached_fetcher(&mock_server, &dir);
        fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap()
    };

    let fetcher = cached_fetcher(&mock_server, &dir);
    let second = fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_force_refresh_bypasses_cache() {
    let mock_server = MockServer::start().await;
    page_mock(PAGE_URL, "<h1>Drone</h1>")
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = cached_fetcher(&mock_server, &dir);

    fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    fetcher
        .fetch(PAGE_URL, &fetcher.options().refreshed())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_render_modes_cached_separately() {
    let mock_server = MockServer::start().await;
    page_mock(PAGE_URL, "<h1>Rendered</h1>")
        .expect(1)
        .mount(&mock_server)
        .await;
    http_page_mock(PAGE_URL, "<h1>Raw</h1>")
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = cached_fetcher(&mock_server, &dir);
    let browser = fetcher.options();
    let http = fetcher.options().with_mode(RenderMode::Http);

    let rendered = fetcher.fetch(PAGE_URL, &browser).await.unwrap();
    let raw = fetcher.fetch(PAGE_URL, &http).await.unwrap();
    assert!(rendered.contains("Rendered"));
    assert!(raw.contains("Raw"));

    // Both now come from the cache
    assert_eq!(fetcher.fetch(PAGE_URL, &browser).await.unwrap(), rendered);
    assert_eq!(fetcher.fetch(PAGE_URL, &http).await.unwrap(), raw);
}

#[tokio::test]
async fn test_clear_cache_scopes() {
    let mock_server = MockServer::start().await;
    let other_url = "https://shop.example/product/2";
    for url in [PAGE_URL, other_url] {
        page_mock(url, "<h1>Page</h1>").mount(&mock_server).await;
        http_page_mock(url, "<h1>Page</h1>").mount(&mock_server).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let fetcher = cached_fetcher(&mock_server, &dir);
    for url in [PAGE_URL, other_url] {
        for mode in RenderMode::ALL {
            let options = fetcher.options().with_mode(mode);
            fetcher.fetch(url, &options).await.unwrap();
        }
    }

    let entry = CacheScope::Entry {
        url: PAGE_URL.to_string(),
        mode: RenderMode::Http,
    };
    assert_eq!(fetcher.clear_cache(&entry), 1);
    assert_eq!(fetcher.clear_cache(&entry), 0);

    assert_eq!(fetcher.clear_cache(&CacheScope::Url(PAGE_URL.to_string())), 1);
    assert_eq!(fetcher.clear_cache(&CacheScope::All), 2);
    assert_eq!(fetcher.clear_cache(&CacheScope::All), 0);
}

#[tokio::test]
async fn test_failures_return_none() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server, None);
    let fetcher = CachedFetcher::from_config(&config).unwrap();

    // Nothing mounted: the mock server answers 404
    assert!(fetcher.fetch(PAGE_URL, &fetcher.options()).await.is_none());
}

#[tokio::test]
async fn test_failed_fetch_not_cached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fetcher = cached_fetcher(&mock_server, &dir);

    assert!(fetcher.fetch(PAGE_URL, &fetcher.options()).await.is_none());
    assert!(fetcher.fetch(PAGE_URL, &fetcher.options()).await.is_none());
}

fn api_client(server: &MockServer) -> ExtractApiClient {
    ExtractApiClient::new(format!("{}{}", server.uri(), API_PATH), "test-key").unwrap()
}

#[tokio::test]
async fn test_api_status_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(520).set_body_string("website ban"))
        .mount(&mock_server)
        .await;

    let result = api_client(&mock_server)
        .fetch_html(PAGE_URL, RenderMode::Browser, Duration::from_secs(5), None)
        .await;

    match result {
        Err(FetchError::Status { status, body }) => {
            assert_eq!(status, 520);
            assert_eq!(body, "website ban");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_malformed_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let result = api_client(&mock_server)
        .fetch_html(PAGE_URL, RenderMode::Browser, Duration::from_secs(5), None)
        .await;
    assert!(matches!(result, Err(FetchError::MalformedBody(_))));
}

#[tokio::test]
async fn test_api_missing_content_field() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": PAGE_URL, "statusCode": 200})),
        )
        .mount(&mock_server)
        .await;

    let result = api_client(&mock_server)
        .fetch_html(PAGE_URL, RenderMode::Browser, Duration::from_secs(5), None)
        .await;

    match result {
        Err(FetchError::MissingContent { field, available }) => {
            assert_eq!(field, "browserHtml");
            assert!(available.contains(&"statusCode".to_string()));
        }
        other => panic!("Expected missing content, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"browserHtml": "<p>late</p>"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let timeout = Duration::from_millis(200);
    let result = api_client(&mock_server)
        .fetch_html(PAGE_URL, RenderMode::Browser, timeout, None)
        .await;
    assert!(matches!(result, Err(FetchError::Timeout(t)) if t == timeout));
}

#[tokio::test]
async fn test_headers_passed_through() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(wiremock::matchers::body_partial_json(json!({
            "url": PAGE_URL,
            "headers": {"Accept-Language": "de-DE"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"browserHtml": "<p>Hallo</p>"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server, None);
    config.fetcher.headers = Some(
        [("Accept-Language".to_string(), "de-DE".to_string())]
            .into_iter()
            .collect(),
    );
    let fetcher = CachedFetcher::from_config(&config).unwrap();

    let html = fetcher.fetch(PAGE_URL, &fetcher.options()).await.unwrap();
    assert!(html.contains("Hallo"));
}

#[tokio::test]
async fn test_find_links_uses_http_mode() {
    let mock_server = MockServer::start().await;
    http_page_mock(
        "https://shop.example/",
        r##"<a href="/product/1">One</a><a href="#top">Top</a><a href="https://other.example/x">X</a>"##,
    )
    .expect(1)
    .mount(&mock_server)
    .await;

    let config = test_config(&mock_server, None);
    let fetcher = CachedFetcher::from_config(&config).unwrap();

    let links = fetcher.find_links("https://shop.example/", None).await;
    assert_eq!(
        links,
        vec![
            "https://shop.example/product/1".to_string(),
            "https://other.example/x".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_find_links_failure_is_empty() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server, None);
    let fetcher = CachedFetcher::from_config(&config).unwrap();

    assert!(fetcher
        .find_links("https://shop.example/", Some("a[href]"))
        .await
        .is_empty());
}
