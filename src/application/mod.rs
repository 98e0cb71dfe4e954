//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the cache and the
//! search provider. Services consume infrastructure traits and provide a clean
//! API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::search_service::SearchService`] - Cache-aside product search

pub mod services;
