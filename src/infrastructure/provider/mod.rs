//! Upstream search provider integrations.

mod google_search;

pub use google_search::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GoogleSearchProvider, ProviderCredentials,
};
