//! Data Transfer Objects for API requests and responses.
//!
//! Response bodies for search reuse [`crate::domain::entities::SearchResponse`].

pub mod health;
pub mod search;
