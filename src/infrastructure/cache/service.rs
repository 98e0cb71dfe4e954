//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Longest accepted entry lifetime (30 days).
pub const MAX_TTL_SECONDS: u64 = 30 * 86_400;

/// Key/value store holding serialized search results.
///
/// Implementations must be safe under concurrent access; callers add no
/// locking of their own. Expiry is enforced by the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - Bounded in-process TTL cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on miss or expired entry
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unreachable. Callers treat
    /// this as a miss.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unreachable.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
