//! Per-client request context.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::CountryCode;

/// Default TTL for cached directory data: 2 days.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Context for directory operations on behalf of one API client.
///
/// Carries the carrier API key, the target country, how long fetched data
/// may be cached, and the path of the locally persisted snapshot file.
/// Immutable per request; supplied by the caller.
#[derive(Debug, Clone)]
pub struct ClientContext {
    /// Carrier API key, sent as the `apikey` query parameter.
    pub api_key: String,

    /// Country whose service points are queried.
    pub country: CountryCode,

    /// How long cached directory data remains valid.
    pub cache_ttl: Duration,

    /// Path of the snapshot file used as offline fallback.
    pub snapshot_path: PathBuf,
}

impl ClientContext {
    /// Create a context with the default cache TTL (2 days).
    pub fn new(
        api_key: impl Into<String>,
        country: CountryCode,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            country,
            cache_ttl: DEFAULT_CACHE_TTL,
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Set a custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
