//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for caching and the upstream search provider.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis, in-memory and no-op implementations)
//! - [`provider`] - Google Custom Search client

pub mod cache;
pub mod provider;
