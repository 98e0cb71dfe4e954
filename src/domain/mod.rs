//! Domain layer containing search entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Product shapes, provider payloads, response envelope
//! - [`query`] - Query normalization and cache key construction
//! - [`fallback`] - Static fallback results and the upstream failure policy
//! - [`providers`] - Search provider trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Provider traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod entities;
pub mod fallback;
pub mod providers;
pub mod query;
