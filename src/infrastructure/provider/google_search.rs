//! Google Custom Search JSON API client.
//!
//! - **Endpoint**: `https://www.googleapis.com/customsearch/v1`
//! - **Authentication**: `key` query parameter, plus the search engine id `cx`
//! - **Retries**: none, one attempt per call

use async_trait::async_trait;
use reqwest::header;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::entities::ProviderPayload;
use crate::domain::providers::{ProviderError, SearchProvider};

/// Default Custom Search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("product-search-gateway/", env!("CARGO_PKG_VERSION"));

/// API key and search engine id.
#[derive(Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"***")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

impl ProviderCredentials {
    /// Builds credentials when both parts are present and non-empty.
    pub fn from_parts(api_key: Option<String>, engine_id: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|k| !k.is_empty())?;
        let engine_id = engine_id.filter(|c| !c.is_empty())?;
        Some(Self { api_key, engine_id })
    }
}

/// Query string sent to the provider.
#[derive(Serialize)]
struct SearchQuery<'a> {
    key: &'a str,
    cx: &'a str,
    q: &'a str,
}

/// Google Custom Search client.
///
/// Constructed even without credentials so that the server can start; every
/// search then fails with [`ProviderError::MissingCredentials`] before any
/// request is sent.
#[derive(Debug, Clone)]
pub struct GoogleSearchProvider {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<ProviderCredentials>,
}

impl GoogleSearchProvider {
    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Network`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<ProviderCredentials>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(&self, term: &str) -> Result<ProviderPayload, ProviderError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ProviderError::MissingCredentials)?;

        let start = Instant::now();
        debug!("searching provider: q={}", term);

        let response = self
            .http
            .get(&self.base_url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .query(&SearchQuery {
                key: &credentials.api_key,
                cx: &credentials.engine_id,
                q: term,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        debug!("provider response status: {}", status);

        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let payload: ProviderPayload =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Parse(e.to_string()))?;

        debug!(
            "provider search completed in {:?}, {} items",
            start.elapsed(),
            payload.items.len()
        );

        Ok(payload)
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}
