//! Page cache for fetched HTML
//!
//! This module provides:
//! - The [`CacheStore`] seam the fetcher talks to
//! - A SQLite-backed store with per-key expiry
//! - [`CacheEntry`], the record stored for every successful fetch
//! - Deterministic cache keys derived from (URL, render mode)

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteCacheStore;
pub use traits::{CacheError, CacheResult, CacheStore};

use crate::fetch::RenderMode;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Key prefix used when the configuration does not name one
pub const DEFAULT_NAMESPACE: &str = "render:html:";

/// Default time-to-live for cached pages (100 days)
pub const DEFAULT_TTL_DAYS: u64 = 100;

/// One cached fetch result
///
/// Entries are written once after a successful live fetch and never
/// modified; they leave the store by expiry or an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Namespaced content hash of (URL, render mode)
    pub key: String,

    /// Minimized HTML
    pub content: String,

    /// When the entry was created
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Time elapsed since the entry was created
    pub fn age(&self) -> Duration {
        Utc::now() - self.timestamp
    }

    /// Serializes the entry into the string stored in the cache
    pub fn to_record(&self) -> CacheResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a stored record back into an entry
    pub fn from_record(record: &str) -> CacheResult<Self> {
        Ok(serde_json::from_str(record)?)
    }
}

/// Computes the cache key for a URL fetched in the given render mode
///
/// The key is `namespace` followed by the hex SHA-256 of `"{url}:{browser}"`,
/// where `browser` is `true` or `false`. The same (URL, mode) pair always maps
/// to the same key, and the two modes never share one.
///
/// # Example
///
/// ```
/// use shop_trawler::cache::{cache_key, DEFAULT_NAMESPACE};
/// use shop_trawler::RenderMode;
///
/// let browser = cache_key(DEFAULT_NAMESPACE, "https://shop.example/p/1", RenderMode::Browser);
/// let http = cache_key(DEFAULT_NAMESPACE, "https://shop.example/p/1", RenderMode::Http);
///
/// assert!(browser.starts_with("render:html:"));
/// assert_ne!(browser, http);
/// ```
pub fn cache_key(namespace: &str, url: &str, mode: RenderMode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", url, mode.is_browser()).as_bytes());
    format!("{}{}", namespace, hex::encode(hasher.finalize()))
}
