//! Page fetching through the remote render/extract API
//!
//! This module contains:
//! - The API client that talks to the render service
//! - The cache-backed fetcher the crawler and the agent use
//! - Failure classification for remote fetches

mod api;
mod cached;

pub use api::{build_http_client, ExtractApiClient, API_KEY_ENV, DEFAULT_API_URL};
pub use cached::{CacheScope, CachedFetcher, FetchOptions};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout for the render API
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the remote API should retrieve a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Render in a headless browser (JavaScript executed)
    #[default]
    Browser,

    /// Plain HTTP response body
    Http,
}

impl RenderMode {
    /// Both modes, browser first
    pub const ALL: [RenderMode; 2] = [RenderMode::Browser, RenderMode::Http];

    /// Returns true for browser rendering
    pub fn is_browser(self) -> bool {
        matches!(self, RenderMode::Browser)
    }

    /// Name of the request flag and response field for this mode
    pub fn api_field(self) -> &'static str {
        match self {
            RenderMode::Browser => "browserHtml",
            RenderMode::Http => "httpResponseBody",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Browser => write!(f, "browser"),
            RenderMode::Http => write!(f, "http"),
        }
    }
}

/// Failure modes of a remote fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No API key configured (set fetcher.api-key or ZYTE_API_KEY)")]
    MissingApiKey,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Response has no '{field}' content (available keys: {available:?})")]
    MissingContent {
        field: &'static str,
        available: Vec<String>,
    },
}

impl FetchError {
    /// Short failure class used in log lines
    pub fn class(&self) -> &'static str {
        match self {
            FetchError::MissingApiKey => "missing-api-key",
            FetchError::Timeout(_) => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::MalformedBody(_) => "malformed-body",
            FetchError::MissingContent { .. } => "missing-content",
        }
    }
}
