//! Port for the external search provider.

use async_trait::async_trait;

use crate::domain::entities::ProviderPayload;

/// Errors from an upstream search call.
///
/// Everything except [`ProviderError::MissingCredentials`] counts as the
/// provider being unavailable and is subject to the fallback policy.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Credentials or collection id are not configured. Raised before any
    /// network attempt.
    #[error("search provider credentials are not configured")]
    MissingCredentials,

    #[error("search provider timed out")]
    Timeout,

    #[error("search provider returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("search provider request failed: {0}")]
    Network(String),

    #[error("search provider returned a malformed payload: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether this error reflects a deployment problem rather than an outage.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::MissingCredentials)
    }
}

/// A search backend queried on cache miss.
///
/// Implementations make a single attempt per call and never retry.
///
/// # Implementations
///
/// - [`crate::infrastructure::provider::GoogleSearchProvider`] - Google Custom Search JSON API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Searches for `term`, which is already normalized.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredentials`] when not configured,
    /// otherwise any transport, status or decoding failure.
    async fn search(&self, term: &str) -> Result<ProviderPayload, ProviderError>;

    /// Whether credentials are present. Used by the health check.
    fn is_configured(&self) -> bool;
}
