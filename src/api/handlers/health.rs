//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Cache**: Backend PING
/// 2. **Provider**: Whether credentials are configured (no network call)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "cache": { "status": "ok", "message": "redis connected" },
///     "provider": { "status": "ok", "message": "Credentials configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let cache_check = check_cache(&state).await;
    let provider_check = check_provider(&state);

    let all_healthy = cache_check.status == "ok" && provider_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            cache: cache_check,
            provider: provider_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks cache connectivity via the backend's health check.
async fn check_cache(state: &AppState) -> CheckStatus {
    let cache = state.search_service.cache();
    let backend = cache.backend();

    if cache.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} connected", backend)),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("{} connection failed", backend)),
        }
    }
}

/// Reports whether the provider can be called at all.
fn check_provider(state: &AppState) -> CheckStatus {
    if state.search_service.provider().is_configured() {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Credentials configured".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("GOOGLE_API_KEY / GOOGLE_CX not set".to_string()),
        }
    }
}
