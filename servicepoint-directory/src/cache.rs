//! In-memory cache with per-entry TTL.
//!
//! Each entry carries its own time-to-live, fixed at insert time as an
//! absolute expiration (now + ttl). Expired entries are treated as absent
//! on the next read; there is no eager sweep beyond moka's own
//! housekeeping.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache as MokaCache;

/// Default maximum number of cached entries.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expiry policy that reads the TTL stored on each entry.
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Overwriting a key replaces the entry and its expiry
        Some(entry.ttl)
    }
}

/// Key/value store with per-entry absolute expiration.
///
/// Keys are non-empty strings. Operations on a blank (empty or whitespace)
/// key are deliberate no-ops: `get` misses and `insert` does nothing,
/// without touching the underlying store. Safe for concurrent readers and
/// writers.
pub struct MemoryCache<V> {
    inner: MokaCache<String, Entry<V>>,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Create a cache bounded to `max_capacity` entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { inner }
    }

    /// Look up a value. Blank keys and expired entries always miss.
    pub async fn get(&self, key: &str) -> Option<V> {
        if key.trim().is_empty() {
            return None;
        }

        self.inner.get(key).await.map(|entry| entry.value)
    }

    /// Store a value that expires `ttl` from now.
    ///
    /// Blank keys are silently ignored. Inserting under an existing key
    /// replaces both the value and its expiration.
    pub async fn insert(&self, key: &str, value: V, ttl: Duration) {
        if key.trim().is_empty() {
            return;
        }

        self.inner.insert(key.to_owned(), Entry { value, ttl }).await;
    }

    /// Number of entries currently tracked. May briefly include expired
    /// entries that have not been swept yet.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl<V> Default for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
