//! End-to-end crawl tests
//!
//! The mock render API serves a small fake shop; the tests check the
//! frontier bounds and the products that come out the other end.

use crate::common::{listing_html, mount_page, page_mock, product_html, test_config};
use async_trait::async_trait;
use shop_trawler::config::StrategyKind;
use shop_trawler::crawler::{trawl, TrawlOutcome, Trawler};
use shop_trawler::extract::{AgentError, ExtractionAgent, PageSource, Product, PromptTemplate};
use shop_trawler::html::links_in;
use shop_trawler::output::CrawlStats;
use shop_trawler::{Config, TrawlError};
use std::sync::Arc;
use wiremock::MockServer;

const SEED: &str = "https://shop.example/";

fn crawl_config(server: &MockServer, max_pages: usize, max_depth: u32) -> Config {
    let mut config = test_config(server, None);
    config.crawler.max_pages = max_pages;
    config.crawler.max_depth = max_depth;
    config
}

async fn run_crawl(config: &Config) -> (Vec<Product>, CrawlStats) {
    match trawl(config, SEED).await.expect("Crawl failed") {
        TrawlOutcome::Products { products, stats } => (products, stats),
        TrawlOutcome::Agent(output) => panic!("Unexpected agent output: {:?}", output),
    }
}

/// Mounts a seed listing three products, each with its own page
async fn mount_small_shop(server: &MockServer) {
    mount_page(
        server,
        SEED,
        &listing_html(&["/product/1", "/product/2", "/product/3"]),
    )
    .await;
    for (i, name) in ["Alpha", "Bravo", "Charlie"].iter().enumerate() {
        let url = format!("https://shop.example/product/{}", i + 1);
        mount_page(server, &url, &product_html(name, "199.99")).await;
    }
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    mount_small_shop(&mock_server).await;

    let config = crawl_config(&mock_server, 10, 1);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 4);
    assert_eq!(stats.product_pages, 3);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.links_enqueued, 3);

    let urls: Vec<&str> = products.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://shop.example/product/1",
            "https://shop.example/product/2",
            "https://shop.example/product/3",
        ]
    );

    let alpha = &products[0];
    assert_eq!(alpha.name, "Alpha");
    assert_eq!(alpha.price.as_deref(), Some("199.99"));
    assert_eq!(alpha.currency.as_deref(), Some("USD"));
    assert_eq!(alpha.description.as_deref(), Some("The Alpha"));
    assert_eq!(alpha.images, vec!["https://shop.example/img/Alpha.jpg"]);
    assert_eq!(alpha.specifications["Weight"], "2kg");
}

#[tokio::test]
async fn test_max_pages_budget() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        SEED,
        &listing_html(&["/product/1", "/product/2", "/product/3", "/product/4"]),
    )
    .await;
    for i in 1..=2 {
        let url = format!("https://shop.example/product/{}", i);
        mount_page(&mock_server, &url, &product_html("Item", "5")).await;
    }
    for i in 3..=4 {
        let url = format!("https://shop.example/product/{}", i);
        page_mock(&url, &product_html("Item", "5"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = crawl_config(&mock_server, 3, 2);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 3);
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_off_site_links_not_followed() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        SEED,
        &listing_html(&["/product/1", "https://other.example/product/9"]),
    )
    .await;
    mount_page(
        &mock_server,
        "https://shop.example/product/1",
        &product_html("Alpha", "10"),
    )
    .await;
    page_mock("https://other.example/product/9", &product_html("Foreign", "1"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = crawl_config(&mock_server, 10, 2);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Alpha");
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, SEED, &listing_html(&["/catalog"])).await;
    mount_page(
        &mock_server,
        "https://shop.example/catalog",
        &listing_html(&["/product/1"]),
    )
    .await;
    page_mock("https://shop.example/product/1", &product_html("Deep", "1"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = crawl_config(&mock_server, 10, 1);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 2);
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_depth_zero_visits_only_seed() {
    let mock_server = MockServer::start().await;
    mount_small_shop(&mock_server).await;

    let config = crawl_config(&mock_server, 10, 0);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.links_enqueued, 0);
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_duplicate_links_visited_once() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        SEED,
        &listing_html(&["/product/1", "/product/1#reviews", "/", "/product/1"]),
    )
    .await;
    page_mock("https://shop.example/product/1", &product_html("Alpha", "10"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = crawl_config(&mock_server, 10, 2);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_is_not_fatal() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        SEED,
        &listing_html(&["/product/1", "/product/missing", "/product/3"]),
    )
    .await;
    mount_page(
        &mock_server,
        "https://shop.example/product/1",
        &product_html("Alpha", "10"),
    )
    .await;
    mount_page(
        &mock_server,
        "https://shop.example/product/3",
        &product_html("Charlie", "30"),
    )
    .await;

    let config = crawl_config(&mock_server, 10, 1);
    let (products, stats) = run_crawl(&config).await;

    assert_eq!(stats.pages_visited, 4);
    assert_eq!(stats.fetch_failures, 1);
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Charlie"]);
}

#[tokio::test]
async fn test_unreachable_seed_gives_no_products() {
    let mock_server = MockServer::start().await;

    let config = crawl_config(&mock_server, 10, 2);
    let (products, stats) = run_crawl(&config).await;

    assert!(products.is_empty());
    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let mock_server = MockServer::start().await;
    let config = crawl_config(&mock_server, 10, 2);

    let result = trawl(&config, "ftp://shop.example/").await;
    assert!(matches!(result, Err(TrawlError::UrlError(_))));
}

#[tokio::test]
async fn test_crawl_uses_page_cache() {
    let mock_server = MockServer::start().await;
    page_mock(SEED, &listing_html(&["/product/1"]))
        .expect(1)
        .mount(&mock_server)
        .await;
    page_mock("https://shop.example/product/1", &product_html("Alpha", "10"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&mock_server, Some(&dir.path().join("cache.db")));
    config.crawler.max_depth = 1;

    let (first, _) = run_crawl(&config).await;
    let (second, _) = run_crawl(&config).await;
    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
}

/// Agent that lists the product links on the page named by its instructions
struct LinkListingAgent;

#[async_trait]
impl ExtractionAgent for LinkListingAgent {
    async fn run(&self, instructions: &str, pages: &dyn PageSource) -> Result<String, AgentError> {
        let url = instructions.trim();
        let html = pages
            .page_html(url)
            .await
            .ok_or_else(|| AgentError::Failed(format!("could not read {}", url)))?;

        let products: Vec<String> = links_in(&html, url, "a[href]")
            .into_iter()
            .filter(|link| link.contains("/product/"))
            .collect();
        Ok(serde_json::json!({ "products": products }).to_string())
    }
}

fn agent_config(server: &MockServer) -> Config {
    let mut config = test_config(server, None);
    config.extraction.strategy = StrategyKind::Agent;
    config.extraction.prompt_template = Some(PromptTemplate::new("{url}"));
    config
}

#[tokio::test]
async fn test_agent_strategy() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        SEED,
        &listing_html(&["/product/1", "/about", "/product/2"]),
    )
    .await;

    let config = agent_config(&mock_server);
    let trawler = Trawler::from_config(&config)
        .unwrap()
        .with_agent(Arc::new(LinkListingAgent));

    match trawler.run(SEED).await.unwrap() {
        TrawlOutcome::Agent(output) => {
            assert!(output.is_structured());
            assert_eq!(
                output.into_value(),
                serde_json::json!({"products": [
                    "https://shop.example/product/1",
                    "https://shop.example/product/2",
                ]})
            );
        }
        other => panic!("Expected agent output, got {:?}", other),
    }
}

#[tokio::test]
async fn test_agent_strategy_without_agent() {
    let mock_server = MockServer::start().await;
    let config = agent_config(&mock_server);

    let result = trawl(&config, SEED).await;
    assert!(matches!(
        result,
        Err(TrawlError::Agent(AgentError::NotConfigured))
    ));
}

#[tokio::test]
async fn test_agent_failure_propagates() {
    let mock_server = MockServer::start().await;
    let config = agent_config(&mock_server);
    let trawler = Trawler::from_config(&config)
        .unwrap()
        .with_agent(Arc::new(LinkListingAgent));

    let result = trawler.run(SEED).await;
    assert!(matches!(result, Err(TrawlError::Agent(AgentError::Failed(_)))));
}
