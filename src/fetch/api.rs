//! Client for the remote render/extract API
//!
//! One POST per page: the request names the URL and either `browserHtml` or
//! `httpResponseBody`, and a successful response carries the page under the
//! same field. Authentication is HTTP basic auth with the API key as the
//! username and an empty password.

use super::{FetchError, RenderMode};
use crate::config::FetcherConfig;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Endpoint used when the configuration does not override it
pub const DEFAULT_API_URL: &str = "https://api.zyte.com/v1/extract";

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "ZYTE_API_KEY";

/// URL fetched by [`ExtractApiClient::test_connection`]
const PROBE_URL: &str = "https://example.com";

/// Longest error body kept in [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    browser_html: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_response_body: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<&'a BTreeMap<String, String>>,
}

impl<'a> ExtractRequest<'a> {
    fn new(
        url: &'a str,
        mode: RenderMode,
        headers: Option<&'a BTreeMap<String, String>>,
    ) -> Self {
        Self {
            url,
            browser_html: mode.is_browser().then_some(true),
            http_response_body: (!mode.is_browser()).then_some(true),
            headers: headers.filter(|h| !h.is_empty()),
        }
    }
}

/// Builds the HTTP client used for API calls
///
/// Request timeouts are set per call, so only the connect timeout is fixed
/// here.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("shop-trawler/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the render/extract API
#[derive(Debug, Clone)]
pub struct ExtractApiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ExtractApiClient {
    /// Creates a client for `api_url` authenticating with `api_key`
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractApiClient)` - Client ready to use
    /// * `Err(FetchError::MissingApiKey)` - The key is empty
    /// * `Err(FetchError::Transport)` - The HTTP client could not be built
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        let client = build_http_client().map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key,
        })
    }

    /// Creates a client from the `[fetcher]` configuration section
    ///
    /// A missing `api-key` falls back to the `ZYTE_API_KEY` environment
    /// variable.
    pub fn from_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .ok_or(FetchError::MissingApiKey)?;

        Self::new(config.api_url.clone(), api_key)
    }

    /// Endpoint this client posts to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the HTML of `url` from the API
    ///
    /// # Arguments
    ///
    /// * `url` - The page to retrieve
    /// * `mode` - Browser rendering or plain HTTP body
    /// * `timeout` - Upper bound for the whole request
    /// * `headers` - Optional headers the API should send to the target site
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page HTML, exactly as the API returned it
    /// * `Err(FetchError)` - The failure class (timeout, transport, status,
    ///   malformed body, missing content)
    pub async fn fetch_html(
        &self,
        url: &str,
        mode: RenderMode,
        timeout: Duration,
        headers: Option<&BTreeMap<String, String>>,
    ) -> Result<String, FetchError> {
        let request = ExtractRequest::new(url, mode, headers);

        let start = Instant::now();
        tracing::debug!("Requesting {} ({} mode) from {}", url, mode, self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.api_key, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, timeout))?;

        tracing::debug!(
            "API answered {} for {} in {:.2}s",
            status.as_u16(),
            url,
            start.elapsed().as_secs_f64()
        );

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        extract_content(&body, mode)
    }

    /// Checks that the API accepts our key by fetching a known page
    ///
    /// # Returns
    ///
    /// * `Ok(Duration)` - Round-trip time of the probe request
    /// * `Err(FetchError)` - Why the probe failed
    pub async fn test_connection(&self) -> Result<Duration, FetchError> {
        let start = Instant::now();
        self.fetch_html(PROBE_URL, RenderMode::Http, Duration::from_secs(10), None)
            .await?;
        Ok(start.elapsed())
    }
}

/// Pulls the page content for `mode` out of a response body
fn extract_content(body: &str, mode: RenderMode) -> Result<String, FetchError> {
    let data: Map<String, Value> = serde_json::from_str(body).map_err(|e| {
        FetchError::MalformedBody(format!("{} (body starts with {:?})", e, truncate(body, 200)))
    })?;

    let field = mode.api_field();
    match data.get(field).and_then(Value::as_str) {
        Some(content) if !content.is_empty() => Ok(content.to_string()),
        _ => Err(FetchError::MissingContent {
            field,
            available: data.keys().cloned().collect(),
        }),
    }
}

fn classify_reqwest_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Transport(error)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
