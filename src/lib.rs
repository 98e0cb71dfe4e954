//! # Product Search Gateway
//!
//! A cache-aside product search service built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Query normalization, product shapes, provider trait
//! - **Application Layer** ([`application`]) - Cache-aside search orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Cache backends and the Google provider
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Request Flow
//!
//! 1. The query is normalized into a namespaced cache key
//! 2. A cached result set is returned as-is
//! 3. Otherwise the provider is called once with a bounded timeout
//! 4. Items are shaped (or replaced by the fallback set) and cached for an hour
//!
//! ## Quick Start
//!
//! ```bash
//! export GOOGLE_API_KEY="..."
//! export GOOGLE_CX="..."
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! curl 'http://localhost:3000/api/search?q=peanut%20butter'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{SearchService, SearchSettings};
    pub use crate::domain::entities::{ProductResult, ResultShape, SearchResponse};
    pub use crate::domain::fallback::UpstreamFailurePolicy;
    pub use crate::domain::query::{CacheKey, normalize};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
