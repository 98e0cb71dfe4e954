//! Provider trait definitions for the domain layer.
//!
//! Concrete providers live in `crate::infrastructure::provider`; mock
//! implementations are generated via `mockall` for unit tests.

pub mod search_provider;

pub use search_provider::{ProviderError, SearchProvider};

#[cfg(test)]
pub use search_provider::MockSearchProvider;
