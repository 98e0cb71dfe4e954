//! In-process cache with per-entry expiry.

use super::service::{CacheError, CacheResult, CacheService, MAX_TTL_SECONDS};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default bound on stored result sets.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: Arc<str>,
    ttl: Duration,
    expires_at: Instant,
}

/// Expires each entry after the TTL it was written with. Overwrites restart
/// the clock.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded TTL cache backed by `moka`.
///
/// Used when Redis is not configured or unreachable at startup, and by
/// integration tests. Expired entries are evicted by moka's housekeeping as
/// the cache is written, and least-recently-used entries go first once
/// capacity is reached.
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        debug!("Using MemoryCache (in-process)");
        Self::default()
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();

        Self { entries }
    }

    /// Time left before `key` expires, or `None` if absent or expired.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entry = self.entries.get(key).await?;
        entry.expires_at.checked_duration_since(Instant::now())
    }

    /// Number of live entries after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self
            .entries
            .get(key)
            .await
            .map(|entry| entry.value.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        if ttl_seconds > MAX_TTL_SECONDS {
            return Err(CacheError::OperationError(format!(
                "TTL {}s for {} exceeds {}s",
                ttl_seconds, key, MAX_TTL_SECONDS
            )));
        }

        let ttl = Duration::from_secs(ttl_seconds);
        let entry = Entry {
            value: Arc::from(value),
            ttl,
            expires_at: Instant::now() + ttl,
        };

        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
