//! HTTP server initialization and runtime setup.
//!
//! Handles cache setup, provider construction, and the Axum server lifecycle.

use crate::application::services::SearchService;
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::provider::GoogleSearchProvider;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Connects the configured cache backend.
///
/// Falls back to [`MemoryCache`] when Redis is not configured or cannot be
/// reached at startup. Returns [`NullCache`] when caching is disabled.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if !config.cache_enabled {
        tracing::warn!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    }

    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache: in-memory (Redis not configured)");
        return Arc::new(MemoryCache::new());
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using MemoryCache.", e);
            Arc::new(MemoryCache::new())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Cache backend (Redis, in-memory fallback, or disabled)
/// - Google Custom Search provider
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cache = build_cache(&config).await;

    let provider = GoogleSearchProvider::new(
        config.search_api_url.clone(),
        config.provider_credentials(),
        config.upstream_timeout(),
    )
    .context("Failed to build search provider client")?;

    let search_service = SearchService::new(cache, Arc::new(provider), config.search_settings());
    let state = AppState::new(Arc::new(search_service));

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
