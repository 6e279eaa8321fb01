//! Cache store trait and error types
//!
//! This module defines the interface the fetcher expects from a key-value
//! store with per-key expiry.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for cache store implementations
///
/// Implementations own expiry: a key whose TTL has elapsed must behave as if
/// it was never set. Stores are shared between crawls running in separate
/// tasks, so every operation takes `&self` and the store serializes access
/// itself.
pub trait CacheStore: Send + Sync {
    /// Checks that the store is reachable
    fn ping(&self) -> CacheResult<()>;

    /// Gets the value for `key`, if present and not expired
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Sets `key` to `value`, expiring after `ttl`
    ///
    /// Overwrites any existing value and resets its expiry.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Deletes `key`
    ///
    /// # Returns
    ///
    /// The number of live entries removed (0 or 1)
    fn delete(&self, key: &str) -> CacheResult<u64>;

    /// Deletes every key starting with `prefix`
    ///
    /// # Returns
    ///
    /// The number of live entries removed
    fn delete_prefix(&self, prefix: &str) -> CacheResult<u64>;
}
