use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use melascope_core::error::{self, ApiError};

/// Transport-level failures. Provider and parse failures never reach this type;
/// the advisor absorbs them into fallback documents.
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
        };

        (status, Json(api_error)).into_response()
    }
}
