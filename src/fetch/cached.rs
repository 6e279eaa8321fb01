//! Cache-backed page fetcher
//!
//! [`CachedFetcher`] answers from the cache when it can and otherwise asks the
//! render API, minimizes the result, and stores it. Every failure is logged
//! and turned into `None`: callers only ever see page content or its absence.
//!
//! The cache is optional. If the store cannot be reached at construction the
//! fetcher warns once and runs uncached; if a later cache call fails, that
//! call is treated as a miss.

use super::{ExtractApiClient, RenderMode, DEFAULT_TIMEOUT};
use crate::cache::{
    cache_key, CacheEntry, CacheStore, SqliteCacheStore, DEFAULT_NAMESPACE, DEFAULT_TTL_DAYS,
};
use crate::config::Config;
use crate::extract::PageSource;
use crate::html::{links_in, minimize, DEFAULT_LINK_SELECTOR};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Per-call fetch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Browser rendering or plain HTTP
    pub mode: RenderMode,

    /// Request timeout for a live fetch
    pub timeout: Duration,

    /// Skip the cache lookup (the result is still stored)
    pub force_refresh: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Browser,
            timeout: DEFAULT_TIMEOUT,
            force_refresh: false,
        }
    }
}

impl FetchOptions {
    /// Returns these options with a different render mode
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns these options with a different timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns these options with the cache lookup skipped
    pub fn refreshed(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Which cached pages to remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheScope {
    /// One URL in one render mode
    Entry { url: String, mode: RenderMode },

    /// One URL in both render modes
    Url(String),

    /// Every entry under the fetcher's namespace
    All,
}

/// Fetcher that caches minimized page content
pub struct CachedFetcher {
    api: ExtractApiClient,
    cache: Option<Arc<dyn CacheStore>>,
    namespace: String,
    ttl: Duration,
    headers: Option<BTreeMap<String, String>>,
    defaults: FetchOptions,
}

impl CachedFetcher {
    /// Creates a fetcher over `api`, caching in `cache` when given
    ///
    /// The store is pinged once; an unreachable store disables caching for
    /// the lifetime of this fetcher.
    pub fn new(api: ExtractApiClient, cache: Option<Arc<dyn CacheStore>>) -> Self {
        let cache = cache.and_then(|store| match store.ping() {
            Ok(()) => Some(store),
            Err(e) => {
                tracing::warn!("Cache store unreachable, caching disabled: {}", e);
                None
            }
        });

        Self {
            api,
            cache,
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl: Duration::from_secs(DEFAULT_TTL_DAYS * SECONDS_PER_DAY),
            headers: None,
            defaults: FetchOptions::default(),
        }
    }

    /// Builds the fetcher described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(CachedFetcher)` - Fetcher ready to use (possibly uncached)
    /// * `Err(FetchError)` - The API client could not be created
    pub fn from_config(config: &Config) -> Result<Self, super::FetchError> {
        let api = ExtractApiClient::from_config(&config.fetcher)?;

        let cache: Option<Arc<dyn CacheStore>> = if config.cache.enabled {
            match SqliteCacheStore::open(Path::new(&config.cache.database_path)) {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!(
                        "Failed to open cache at {}, caching disabled: {}",
                        config.cache.database_path,
                        e
                    );
                    None
                }
            }
        } else {
            tracing::info!("Page cache disabled by configuration");
            None
        };

        let defaults = FetchOptions::default()
            .with_mode(config.fetcher.render_mode)
            .with_timeout(Duration::from_secs(config.fetcher.timeout_secs));

        Ok(Self::new(api, cache)
            .with_namespace(config.cache.namespace.clone())
            .with_ttl(Duration::from_secs(
                config.cache.ttl_days.saturating_mul(SECONDS_PER_DAY),
            ))
            .with_headers(config.fetcher.headers.clone())
            .with_defaults(defaults))
    }

    /// Sets the cache key namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the time-to-live of stored entries
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets headers passed through to the API on every live fetch
    pub fn with_headers(mut self, headers: Option<BTreeMap<String, String>>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the options returned by [`CachedFetcher::options`]
    pub fn with_defaults(mut self, defaults: FetchOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// The configured default fetch options
    pub fn options(&self) -> FetchOptions {
        self.defaults
    }

    /// Returns true if a cache store is in use
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// The underlying API client
    pub fn api(&self) -> &ExtractApiClient {
        &self.api
    }

    /// Fetches minimized HTML for `url`
    ///
    /// # Flow
    ///
    /// 1. Unless `force_refresh` is set, return a live cache entry if one exists
    /// 2. Otherwise make one API call in the requested mode
    /// 3. Minimize the content, store it with the configured TTL, return it
    ///
    /// # Returns
    ///
    /// * `Some(String)` - Minimized HTML (from cache or a live fetch)
    /// * `None` - The fetch failed; the failure class has been logged
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Option<String> {
        let key = cache_key(&self.namespace, url, options.mode);

        if !options.force_refresh {
            if let Some(entry) = self.lookup(&key) {
                let age = entry.age();
                tracing::info!(
                    "Cache hit for {} ({} mode, age: {} days, {} hours)",
                    url,
                    options.mode,
                    age.num_days(),
                    age.num_hours() % 24
                );
                return Some(entry.content);
            }
        }

        tracing::info!("Fetching {} from API ({} mode)", url, options.mode);

        match self
            .api
            .fetch_html(url, options.mode, options.timeout, self.headers.as_ref())
            .await
        {
            Ok(html) => {
                let minimized = minimize(&html);
                tracing::info!(
                    "Fetched {} ({} bytes, {} after minimizing)",
                    url,
                    html.len(),
                    minimized.len()
                );
                self.store(&key, url, &minimized);
                Some(minimized)
            }
            Err(e) => {
                tracing::warn!("Fetch failed for {} [{}]: {}", url, e.class(), e);
                None
            }
        }
    }

    /// Removes cached pages
    ///
    /// # Returns
    ///
    /// The number of entries removed (0 when caching is disabled or the
    /// store fails)
    pub fn clear_cache(&self, scope: &CacheScope) -> u64 {
        let Some(store) = &self.cache else {
            return 0;
        };

        let result = match scope {
            CacheScope::Entry { url, mode } => store.delete(&cache_key(&self.namespace, url, *mode)),
            CacheScope::Url(url) => RenderMode::ALL.iter().try_fold(0u64, |removed, mode| {
                store
                    .delete(&cache_key(&self.namespace, url, *mode))
                    .map(|n| removed + n)
            }),
            CacheScope::All => store.delete_prefix(&self.namespace),
        };

        match result {
            Ok(removed) => {
                tracing::info!("Cleared {} cache entries ({:?})", removed, scope);
                removed
            }
            Err(e) => {
                tracing::warn!("Failed to clear cache ({:?}): {}", scope, e);
                0
            }
        }
    }

    /// Fetches `url` in plain HTTP mode and returns its links
    ///
    /// # Arguments
    ///
    /// * `url` - The page to scan
    /// * `selector` - Elements whose `href` to collect (default `a[href]`)
    ///
    /// # Returns
    ///
    /// Absolute URLs in document order; empty if the fetch fails
    pub async fn find_links(&self, url: &str, selector: Option<&str>) -> Vec<String> {
        let options = self.defaults.with_mode(RenderMode::Http);
        match self.fetch(url, &options).await {
            Some(html) => links_in(&html, url, selector.unwrap_or(DEFAULT_LINK_SELECTOR)),
            None => Vec::new(),
        }
    }

    fn lookup(&self, key: &str) -> Option<CacheEntry> {
        let store = self.cache.as_ref()?;

        let record = match store.get(key) {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!("Cache read failed, fetching live: {}", e);
                return None;
            }
        };

        match CacheEntry::from_record(&record) {
            Ok(entry) if !entry.content.is_empty() => Some(entry),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {}", key, e);
                None
            }
        }
    }

    fn store(&self, key: &str, url: &str, content: &str) {
        let Some(store) = &self.cache else {
            return;
        };
        if content.is_empty() {
            return;
        }

        let entry = CacheEntry::new(key, content);
        let result = entry
            .to_record()
            .and_then(|record| store.set(key, &record, self.ttl));

        match result {
            Ok(()) => tracing::debug!("Cached {} bytes for {}", content.len(), url),
            Err(e) => tracing::warn!("Failed to cache {}: {}", url, e),
        }
    }
}

#[async_trait]
impl PageSource for CachedFetcher {
    async fn page_html(&self, url: &str) -> Option<String> {
        self.fetch(url, &self.defaults).await
    }
}
