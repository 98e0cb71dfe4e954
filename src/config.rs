//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Search Provider
//!
//! ```bash
//! export GOOGLE_API_KEY="..."
//! export GOOGLE_CX="..."
//! ```
//!
//! Both are optional at startup. Without them the server runs, serves cache
//! hits, and answers cache misses with a configuration error.
//!
//! ## Cache
//!
//! ### Method 1: Full URL
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! ```
//!
//! ### Method 2: Individual components
//!
//! ```bash
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without Redis configuration an in-process cache is used. Set
//! `CACHE_ENABLED=false` to disable caching entirely.
//!
//! ## Optional Variables
//!
//! - `SEARCH_API_URL` - Provider endpoint (default: Google Custom Search)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CACHE_TTL_SECONDS` - Cached result lifetime (default: 3600, max: 30 days)
//! - `UPSTREAM_TIMEOUT_SECONDS` - Provider call ceiling (default: 5, max: 60)
//! - `RESULT_SHAPE` - `rich` or `lean` (default: `rich`)
//! - `UPSTREAM_FAILURE_POLICY` - `fallback` or `strict` (default: `fallback`)

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::application::services::{DEFAULT_CACHE_TTL_SECONDS, SearchSettings};
use crate::domain::entities::ResultShape;
use crate::domain::fallback::UpstreamFailurePolicy;
use crate::infrastructure::cache::MAX_TTL_SECONDS;
use crate::infrastructure::provider::{DEFAULT_BASE_URL, ProviderCredentials};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key (`GOOGLE_API_KEY`).
    pub google_api_key: Option<String>,
    /// Provider search engine id (`GOOGLE_CX`).
    pub google_cx: Option<String>,
    pub search_api_url: String,
    pub redis_url: Option<String>,
    /// When false, every request goes upstream (`CACHE_ENABLED`, default: true).
    pub cache_enabled: bool,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub cache_ttl_seconds: u64,
    pub upstream_timeout_seconds: u64,
    pub result_shape: ResultShape,
    pub failure_policy: UpstreamFailurePolicy,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an enum-valued variable has an unknown value.
    pub fn from_env() -> Result<Self> {
        let google_api_key = env::var("GOOGLE_API_KEY").ok();
        let google_cx = env::var("GOOGLE_CX").ok();
        let search_api_url =
            env::var("SEARCH_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let redis_url = Self::load_redis_url();

        let cache_enabled = env::var("CACHE_ENABLED")
            .map(|v| !(v.eq_ignore_ascii_case("false") || v == "0"))
            .unwrap_or(true);

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let cache_ttl_seconds = env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECONDS);

        let upstream_timeout_seconds = env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let result_shape = env::var("RESULT_SHAPE")
            .ok()
            .map(|v| v.parse::<ResultShape>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid RESULT_SHAPE")?
            .unwrap_or_default();

        let failure_policy = env::var("UPSTREAM_FAILURE_POLICY")
            .ok()
            .map(|v| v.parse::<UpstreamFailurePolicy>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid UPSTREAM_FAILURE_POLICY")?
            .unwrap_or_default();

        Ok(Self {
            google_api_key,
            google_cx,
            search_api_url,
            redis_url,
            cache_enabled,
            listen_addr,
            log_level,
            log_format,
            cache_ttl_seconds,
            upstream_timeout_seconds,
            result_shape,
            failure_policy,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `search_api_url` is not an absolute HTTP(S) URL
    /// - `redis_url` has the wrong scheme
    /// - `cache_ttl_seconds` is outside `1..=2592000` (30 days)
    /// - `upstream_timeout_seconds` is outside `1..=60`
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        let api_url = url::Url::parse(&self.search_api_url)
            .with_context(|| format!("SEARCH_API_URL is not a valid URL: '{}'", self.search_api_url))?;
        if api_url.scheme() != "http" && api_url.scheme() != "https" {
            anyhow::bail!(
                "SEARCH_API_URL must use http or https, got '{}'",
                self.search_api_url
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.cache_ttl_seconds == 0 || self.cache_ttl_seconds > MAX_TTL_SECONDS {
            anyhow::bail!(
                "CACHE_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_TTL_SECONDS,
                self.cache_ttl_seconds
            );
        }

        if self.upstream_timeout_seconds == 0 || self.upstream_timeout_seconds > 60 {
            anyhow::bail!(
                "UPSTREAM_TIMEOUT_SECONDS must be between 1 and 60, got {}",
                self.upstream_timeout_seconds
            );
        }

        Ok(())
    }

    /// Returns provider credentials if both key and engine id are set.
    pub fn provider_credentials(&self) -> Option<ProviderCredentials> {
        ProviderCredentials::from_parts(self.google_api_key.clone(), self.google_cx.clone())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Per-deployment settings for the search service.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            shape: self.result_shape,
            failure_policy: self.failure_policy,
            cache_ttl_seconds: self.cache_ttl_seconds,
            upstream_timeout: self.upstream_timeout(),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Search API: {}", self.search_api_url);

        if self.provider_credentials().is_some() {
            tracing::info!("  Provider credentials: configured");
        } else {
            tracing::warn!("  Provider credentials: missing (GOOGLE_API_KEY / GOOGLE_CX)");
        }

        if !self.cache_enabled {
            tracing::warn!("  Cache: disabled");
        } else if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {} (enabled)", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: disabled (in-memory cache)");
        }

        tracing::info!("  Cache TTL: {}s", self.cache_ttl_seconds);
        tracing::info!("  Upstream timeout: {}s", self.upstream_timeout_seconds);
        tracing::info!("  Result shape: {}", self.result_shape);
        tracing::info!("  Upstream failure policy: {}", self.failure_policy);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
