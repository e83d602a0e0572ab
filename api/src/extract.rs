//! JSON extractor that turns axum rejections into structured `AppError` responses.
//!
//! Advisory requests come from the browser UI; a malformed body should yield
//! a 400 `ApiError` naming the offending field, not axum's plain-text 422.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

const TARGET_TYPE_PREFIX: &str = "into the target type: ";

/// Drop-in replacement for `axum::Json<T>` in handler signatures.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    let field = field_from_serde_message(&body_text).unwrap_or_else(|| "body".to_string());

    AppError::Validation {
        message: format!("Invalid request body: {body_text}"),
        field: Some(field),
        received: None,
        docs_hint: Some(
            "Expected {\"label\": string, \"confidence\": number} (plus \"history\" for chat). \
             See GET /api-doc/openapi.json."
                .to_string(),
        ),
    }
}

/// Best-effort field name from a serde error message.
///
/// Handles `missing field `x``, and path-prefixed errors such as
/// `history[0].role: unknown variant `system``.
fn field_from_serde_message(msg: &str) -> Option<String> {
    if let Some(name) = backticked_after(msg, "missing field `") {
        return Some(name);
    }
    if let Some(name) = backticked_after(msg, "unknown field `") {
        return Some(name);
    }

    let detail = msg
        .find(TARGET_TYPE_PREFIX)
        .map_or(msg, |idx| &msg[idx + TARGET_TYPE_PREFIX.len()..]);
    let (path, _) = detail.split_once(": ")?;
    let looks_like_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    looks_like_path.then(|| path.to_string())
}

fn backticked_after(msg: &str, marker: &str) -> Option<String> {
    let start = msg.find(marker)? + marker.len();
    let rest = &msg[start..];
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
