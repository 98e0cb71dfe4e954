//! Cache-aside product search.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::entities::{ProductResult, ResultShape, ResultSource, SearchResponse};
use crate::domain::fallback::{UpstreamFailurePolicy, fallback_products};
use crate::domain::providers::{ProviderError, SearchProvider};
use crate::domain::query::CacheKey;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Default lifetime of a cached result set.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Fixed per-deployment behaviour of [`SearchService`].
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub shape: ResultShape,
    pub failure_policy: UpstreamFailurePolicy,
    pub cache_ttl_seconds: u64,
    /// Ceiling on a single provider call, enforced around the provider future.
    pub upstream_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            shape: ResultShape::default(),
            failure_policy: UpstreamFailurePolicy::default(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            upstream_timeout: Duration::from_secs(5),
        }
    }
}

/// Serves product searches from the cache, falling back to the provider.
///
/// # Request Flow
///
/// 1. Reject empty or whitespace-only queries
/// 2. Normalize the query into a [`CacheKey`]
/// 3. On cache hit, return the stored results without touching the network
/// 4. On miss, call the provider once, bounded by the upstream timeout
/// 5. Shape the provider items, or apply the failure policy
/// 6. Store the results under the key with the configured TTL
///
/// Cache failures and undecodable cache entries are treated as misses.
/// Concurrent misses for the same key each call the provider; the last
/// write wins.
pub struct SearchService {
    cache: Arc<dyn CacheService>,
    provider: Arc<dyn SearchProvider>,
    settings: SearchSettings,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(
        cache: Arc<dyn CacheService>,
        provider: Arc<dyn SearchProvider>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            cache,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    pub fn provider(&self) -> &Arc<dyn SearchProvider> {
        &self.provider
    }

    /// Searches for `raw_query`.
    ///
    /// The response echoes `raw_query` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for blank input, before any cache or
    /// provider access.
    /// Returns [`AppError::Configuration`] on a miss when provider credentials
    /// are absent.
    /// Returns [`AppError::UpstreamUnavailable`] when the provider fails under
    /// [`UpstreamFailurePolicy::Strict`].
    pub async fn search(&self, raw_query: &str) -> Result<SearchResponse, AppError> {
        let key = CacheKey::try_from_query(raw_query).inspect_err(|_| {
            metrics::counter!("search_requests_total", "outcome" => "rejected").increment(1);
        })?;

        if let Some(results) = self.lookup(&key).await {
            info!("Cache hit for query: {}", key.term());
            metrics::counter!("search_requests_total", "outcome" => "hit").increment(1);
            return Ok(SearchResponse {
                query: raw_query.to_string(),
                results,
                source: ResultSource::Cache,
            });
        }

        info!("Cache miss for query: {}", key.term());
        metrics::counter!("search_requests_total", "outcome" => "miss").increment(1);

        let (results, source) = match self.fetch(&key).await {
            Ok(results) => {
                metrics::counter!("search_upstream_total", "result" => "ok").increment(1);
                (results, ResultSource::Upstream)
            }
            Err(e) if e.is_configuration() => {
                warn!("Search provider not configured");
                return Err(e.into());
            }
            Err(e) => {
                metrics::counter!("search_upstream_total", "result" => "error").increment(1);
                match self.settings.failure_policy {
                    UpstreamFailurePolicy::Fallback => {
                        warn!("Search provider error for {}: {}. Serving fallback.", key.term(), e);
                        metrics::counter!("search_fallback_total").increment(1);
                        (fallback_products(self.settings.shape), ResultSource::Fallback)
                    }
                    UpstreamFailurePolicy::Strict => {
                        warn!("Search provider error for {}: {}", key.term(), e);
                        return Err(e.into());
                    }
                }
            }
        };

        self.store(&key, &results).await;

        Ok(SearchResponse {
            query: raw_query.to_string(),
            results,
            source,
        })
    }

    /// Reads and decodes a cached result set. Any failure is a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<Vec<ProductResult>> {
        let cached = match self.cache.get(key.as_str()).await {
            Ok(cached) => cached?,
            Err(e) => {
                warn!("Cache unavailable, treating as miss: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&cached) {
            Ok(results) => Some(results),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Calls the provider once with the normalized term and shapes the items.
    async fn fetch(&self, key: &CacheKey) -> Result<Vec<ProductResult>, ProviderError> {
        let payload = tokio::time::timeout(
            self.settings.upstream_timeout,
            self.provider.search(key.term()),
        )
        .await
        .map_err(|_| ProviderError::Timeout)??;

        debug!("Provider returned {} items for {}", payload.items.len(), key.term());
        Ok(self.settings.shape.shape_all(&payload.items))
    }

    /// Writes the result set under `key`, overwriting any previous entry.
    async fn store(&self, key: &CacheKey, results: &[ProductResult]) {
        let encoded = match serde_json::to_string(results) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode results for {}: {}", key, e);
                return;
            }
        };

        match self
            .cache
            .set(key.as_str(), &encoded, self.settings.cache_ttl_seconds)
            .await
        {
            Ok(()) => info!("Cache set for query: {}", key.term()),
            Err(e) => warn!("Failed to cache results for {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ProviderPayload, RichProduct, UNKNOWN};
    use crate::domain::providers::MockSearchProvider;
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use async_trait::async_trait;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use serde_json::json;
    use std::collections::HashMap;

    fn payload(n: usize) -> ProviderPayload {
        let items: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "title": format!("Peanut Butter {}", i),
                    "link": format!("https://shop.example.com/{}", i),
                    "snippet": "Creamy",
                    "pagemap": { "brand": ["Acme"] }
                })
            })
            .collect();
        serde_json::from_value(json!({ "items": items })).unwrap()
    }

    fn cached_rich() -> Vec<ProductResult> {
        vec![ProductResult::Rich(RichProduct {
            name: "Cached Jar".to_string(),
            brand: "Acme".to_string(),
            price_usd: "$2".to_string(),
            price_inr: UNKNOWN.to_string(),
            weight: "200g".to_string(),
            link: "https://example.com/cached".to_string(),
        })]
    }

    fn service(
        cache: MockCacheService,
        provider: MockSearchProvider,
        settings: SearchSettings,
    ) -> SearchService {
        SearchService::new(Arc::new(cache), Arc::new(provider), settings)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let mut cache = MockCacheService::new();
        let encoded = serde_json::to_string(&cached_rich()).unwrap();
        cache
            .expect_get()
            .withf(|key| key == "products:peanut butter")
            .times(1)
            .returning(move |_| Ok(Some(encoded.clone())));
        cache.expect_set().times(0);

        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(0);

        let service = service(cache, provider, SearchSettings::default());
        let response = service.search("  Peanut   BUTTER ").await.unwrap();

        assert_eq!(response.query, "  Peanut   BUTTER ");
        assert_eq!(response.results, cached_rich());
        assert_eq!(response.source, ResultSource::Cache);
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_shapes_and_stores() {
        let mut cache = MockCacheService::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, value, ttl| {
                let stored: Vec<ProductResult> = serde_json::from_str(value).unwrap();
                key == "products:peanut butter" && *ttl == 3600 && stored.len() == 3
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .withf(|term| term == "peanut butter")
            .times(1)
            .returning(|_| Ok(payload(3)));

        let service = service(cache, provider, SearchSettings::default());
        let response = service.search("Peanut Butter").await.unwrap();

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.source, ResultSource::Upstream);
        let ProductResult::Rich(first) = &response.results[0] else {
            panic!("expected rich product");
        };
        assert_eq!(first.name, "Peanut Butter 0");
        assert_eq!(first.brand, "Acme");
        assert_eq!(first.price_usd, UNKNOWN);
    }

    #[tokio::test]
    async fn test_lean_shape_from_settings() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().returning(|_, _, _| Ok(()));

        let mut provider = MockSearchProvider::new();
        provider.expect_search().returning(|_| Ok(payload(1)));

        let settings = SearchSettings {
            shape: ResultShape::Lean,
            ..SearchSettings::default()
        };
        let response = service(cache, provider, settings)
            .search("jam")
            .await
            .unwrap();

        let ProductResult::Lean(lean) = &response.results[0] else {
            panic!("expected lean product");
        };
        assert_eq!(lean.title.as_deref(), Some("Peanut Butter 0"));
        assert_eq!(lean.snippet.as_deref(), Some("Creamy"));
    }

    #[tokio::test]
    async fn test_zero_items_is_not_a_failure() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|_, value, _| value == "[]")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .times(1)
            .returning(|_| Ok(ProviderPayload::default()));

        let response = service(cache, provider, SearchSettings::default())
            .search("unobtainium")
            .await
            .unwrap();

        assert!(response.results.is_empty());
        assert_eq!(response.source, ResultSource::Upstream);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_without_side_effects() {
        for raw in ["", "   ", "\t\n"] {
            let mut cache = MockCacheService::new();
            cache.expect_get().times(0);
            cache.expect_set().times(0);
            let mut provider = MockSearchProvider::new();
            provider.expect_search().times(0);

            let result = service(cache, provider, SearchSettings::default())
                .search(raw)
                .await;

            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_provider_error_serves_and_caches_fallback() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, _, ttl| key == "products:jam" && *ttl == 3600)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .times(1)
            .returning(|_| Err(ProviderError::HttpStatus { status: 500 }));

        let response = service(cache, provider, SearchSettings::default())
            .search("Jam")
            .await
            .unwrap();

        assert_eq!(response.source, ResultSource::Fallback);
        assert_eq!(response.results, fallback_products(ResultShape::Rich));
    }

    #[tokio::test]
    async fn test_provider_error_strict_policy_surfaces_error() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(0);

        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_| Err(ProviderError::Network("connection refused".to_string())));

        let settings = SearchSettings {
            failure_policy: UpstreamFailurePolicy::Strict,
            ..SearchSettings::default()
        };
        let result = service(cache, provider, settings).search("jam").await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_missing_credentials_is_configuration_error() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(0);

        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_| Err(ProviderError::MissingCredentials));

        // Fallback policy does not mask configuration errors.
        let result = service(cache, provider, SearchSettings::default())
            .search("jam")
            .await;

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_cache_error_degrades_to_miss() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        cache
            .expect_set()
            .times(1)
            .returning(|_, _, _| Err(CacheError::ConnectionError("down".to_string())));

        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(1).returning(|_| Ok(payload(2)));

        let response = service(cache, provider, SearchSettings::default())
            .search("jam")
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.source, ResultSource::Upstream);
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .returning(|_| Ok(Some("not json".to_string())));
        cache.expect_set().times(1).returning(|_, _, _| Ok(()));

        let mut provider = MockSearchProvider::new();
        provider.expect_search().times(1).returning(|_| Ok(payload(1)));

        let response = service(cache, provider, SearchSettings::default())
            .search("jam")
            .await
            .unwrap();

        assert_eq!(response.source, ResultSource::Upstream);
    }

    struct StalledProvider;

    #[async_trait]
    impl SearchProvider for StalledProvider {
        async fn search(&self, _term: &str) -> Result<ProviderPayload, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(ProviderPayload::default())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_applies_policy() {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(1).returning(|_, _, _| Ok(()));

        let service = SearchService::new(
            Arc::new(cache),
            Arc::new(StalledProvider),
            SearchSettings::default(),
        );

        let response = service.search("jam").await.unwrap();
        assert_eq!(response.source, ResultSource::Fallback);

        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().times(0);

        let strict = SearchService::new(
            Arc::new(cache),
            Arc::new(StalledProvider),
            SearchSettings {
                failure_policy: UpstreamFailurePolicy::Strict,
                ..SearchSettings::default()
            },
        );

        let result = strict.search("jam").await;
        let Err(AppError::UpstreamUnavailable { details, .. }) = result else {
            panic!("expected upstream error");
        };
        assert_eq!(details["reason"], "search provider timed out");
    }

    #[test]
    fn test_counters_record_outcomes() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let mut cache = MockCacheService::new();
                let encoded = serde_json::to_string(&cached_rich()).unwrap();
                let mut replies = vec![Some(encoded), None];
                cache
                    .expect_get()
                    .times(2)
                    .returning(move |_| Ok(replies.pop().flatten()));
                cache.expect_set().times(1).returning(|_, _, _| Ok(()));

                let mut provider = MockSearchProvider::new();
                provider
                    .expect_search()
                    .times(1)
                    .returning(|_| Err(ProviderError::HttpStatus { status: 503 }));

                let service = service(cache, provider, SearchSettings::default());
                assert!(service.search("   ").await.is_err());
                service.search("jam").await.unwrap();
                service.search("JAM").await.unwrap();
            });
        });

        let counters: HashMap<String, u64> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| {
                let DebugValue::Counter(count) = value else {
                    return None;
                };
                let key = key.key();
                let labels: Vec<String> = key
                    .labels()
                    .map(|label| format!("{}={}", label.key(), label.value()))
                    .collect();
                Some((format!("{}{{{}}}", key.name(), labels.join(",")), count))
            })
            .collect();

        assert_eq!(counters["search_requests_total{outcome=rejected}"], 1);
        assert_eq!(counters["search_requests_total{outcome=miss}"], 1);
        assert_eq!(counters["search_requests_total{outcome=hit}"], 1);
        assert_eq!(counters["search_upstream_total{result=error}"], 1);
        assert_eq!(counters["search_fallback_total{}"], 1);
    }
}
