//! Search response envelope.

use serde::Serialize;

use super::ProductResult;

/// Where the results of a request came from.
///
/// Not part of the response body; handlers expose it as the `X-Cache` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Cache,
    Upstream,
    Fallback,
}

impl ResultSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultSource::Cache => "hit",
            ResultSource::Upstream => "miss",
            ResultSource::Fallback => "fallback",
        }
    }
}

/// Results for one search request.
///
/// `query` echoes the caller's input verbatim, not the normalized key.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ProductResult>,

    #[serde(skip)]
    pub source: ResultSource,
}
