//! DTOs for the product search endpoint.

use serde::Deserialize;

/// Query string of `GET /api/search`.
///
/// `q` is optional at the extractor level so that a missing parameter gets the
/// same validation error as an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}
