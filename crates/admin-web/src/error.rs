//! Error types for the admin web console.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur in the admin web console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Backend client error.
    #[error("Backend error: {0}")]
    Api(#[from] disaster_api::ApiError),

    /// The built-in alert template failed to parse.
    #[error("Template error: {0}")]
    Template(#[from] alert_desk::MarkupError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AdminError::Api(err) => {
                tracing::error!("Backend error: {}", err);
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            AdminError::Template(err) => {
                tracing::error!("Template error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
