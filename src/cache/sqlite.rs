//! SQLite cache store implementation
//!
//! Entries carry an absolute expiry time (Unix seconds). Expired rows are
//! invisible to reads and are purged whenever a write or delete runs.

use crate::cache::schema::initialize_schema;
use crate::cache::traits::{CacheError, CacheResult, CacheStore};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite-backed cache store
pub struct SqliteCacheStore {
    conn: Mutex<Connection>,
}

impl SqliteCacheStore {
    /// Opens (or creates) a cache database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCacheStore)` - Successfully opened/created database
    /// * `Err(CacheError)` - Failed to open database
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory cache (nothing survives the process)
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Removes every expired entry
    ///
    /// # Returns
    ///
    /// The number of rows removed
    pub fn purge_expired(&self) -> CacheResult<u64> {
        let conn = self.lock()?;
        purge_expired(&conn)
    }

    /// Counts live (non-expired) entries
    pub fn len(&self) -> CacheResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cache_entries WHERE expires_at > ?1",
            params![now()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Returns true if the cache holds no live entries
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Unavailable("cache connection lock poisoned".to_string()))
    }
}

impl CacheStore for SqliteCacheStore {
    fn ping(&self) -> CacheResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1 AND expires_at > ?2",
                params![key, now()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = now().saturating_add(ttl_secs);

        let conn = self.lock()?;
        purge_expired(&conn)?;
        conn.execute(
            "INSERT INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> CacheResult<u64> {
        let conn = self.lock()?;
        purge_expired(&conn)?;
        let removed = conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
        Ok(removed as u64)
    }

    fn delete_prefix(&self, prefix: &str) -> CacheResult<u64> {
        let conn = self.lock()?;
        purge_expired(&conn)?;
        // substr comparison keeps '%' and '_' in the prefix literal
        let removed = conn.execute(
            "DELETE FROM cache_entries WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        Ok(removed as u64)
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

fn purge_expired(conn: &Connection) -> CacheResult<u64> {
    let removed = conn.execute(
        "DELETE FROM cache_entries WHERE expires_at <= ?1",
        params![now()],
    )?;
    Ok(removed as u64)
}
