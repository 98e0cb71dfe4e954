//! Handler for product search.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};

use crate::api::dto::search::SearchParams;
use crate::error::AppError;
use crate::state::AppState;

/// Searches products by free-text term.
///
/// # Endpoint
///
/// `GET /api/search?q=<term>`
///
/// # Response
///
/// ```json
/// {
///   "query": "Peanut Butter",
///   "results": [
///     {
///       "name": "Organic Peanut Butter",
///       "brand": "Organic Co",
///       "price_usd": "$6.49",
///       "price_inr": "Unknown",
///       "weight": "400g",
///       "link": "https://example.com/product2"
///     }
///   ]
/// }
/// ```
///
/// The `X-Cache` header is `hit`, `miss` or `fallback`.
///
/// # Errors
///
/// - **400 Bad Request**: `q` missing, empty or whitespace-only, or the query
///   string cannot be decoded
/// - **500 Internal Server Error**: provider credentials not configured
/// - **502 Bad Gateway**: provider failed and the strict failure policy is active
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let query = params.q.unwrap_or_default();

    let response = state.search_service.search(&query).await?;

    Ok(([("x-cache", response.source.as_str())], Json(response)))
}
