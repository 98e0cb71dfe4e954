//! API route configuration.

use crate::api::handlers::search_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Public API routes.
///
/// # Endpoints
///
/// - `GET /search?q=<term>` - Cache-aside product search
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_handler))
}
