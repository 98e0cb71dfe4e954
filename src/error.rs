//! Application error type and its JSON response mapping.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::providers::ProviderError;
use crate::domain::query::QueryError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload nested under `error` in every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    /// Invalid client input (400).
    Validation { message: String, details: Value },
    /// Deployment is missing required settings (500).
    Configuration { message: String, details: Value },
    /// Upstream provider failed and the strict policy is active (502).
    UpstreamUnavailable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn configuration(message: impl Into<String>, details: Value) -> Self {
        Self::Configuration {
            message: message.into(),
            details,
        }
    }
    pub fn upstream_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Configuration { message, details } => {
                ("configuration_error", message, details)
            }
            AppError::UpstreamUnavailable { message, details } => {
                ("upstream_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.to_error_info();
        write!(f, "{}: {}", info.code, info.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::bad_request(e.to_string(), json!({ "param": "q" }))
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::bad_request("Invalid query string", json!({ "reason": e.body_text() }))
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        if e.is_configuration() {
            AppError::configuration(
                "Search provider is not configured",
                json!({ "required": ["GOOGLE_API_KEY", "GOOGLE_CX"] }),
            )
        } else {
            AppError::upstream_unavailable(
                "Search provider unavailable",
                json!({ "reason": e.to_string() }),
            )
        }
    }
}
