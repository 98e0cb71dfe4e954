//! Business logic services for the application layer.

pub mod search_service;

pub use search_service::{DEFAULT_CACHE_TTL_SECONDS, SearchService, SearchSettings};
