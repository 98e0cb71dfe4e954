//! Domain entities for product search.
//!
//! - [`ProductResult`] - A shaped product as returned to callers
//! - [`ProviderPayload`] / [`ProviderItem`] - Raw upstream search hits
//! - [`SearchResponse`] - The per-request response envelope

pub mod product;
pub mod provider_item;
pub mod search_response;

pub use product::{LeanProduct, ProductResult, ResultShape, RichProduct, UNKNOWN};
pub use provider_item::{PageMap, ProviderItem, ProviderPayload};
pub use search_response::{ResultSource, SearchResponse};
