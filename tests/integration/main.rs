//! Integration tests for Shop-Trawler
//!
//! These tests use wiremock to stand in for the render API and drive the
//! fetcher and the crawl loop end-to-end.

mod common;
mod crawl_tests;
mod fetcher_tests;
