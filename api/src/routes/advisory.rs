use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use melascope_core::advisory::{AdvisoryDocument, ChatReply};
use melascope_core::error::ApiError;
use melascope_core::message::ChatTurn;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::validate_classification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/advisory", post(advisory))
        .route("/api/advisory/chat", post(advisory_chat))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdvisoryRequest {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    pub label: String,
    pub confidence: f64,
    /// Prior conversation, oldest first. The last user turn is the question.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Structured advisory for a classifier result.
///
/// Always answers 200 for well-formed input. Provider outages, timeouts and
/// unparseable model output degrade to a fallback document instead of an error.
#[utoipa::path(
    post,
    path = "/api/advisory",
    request_body = AdvisoryRequest,
    responses(
        (
            status = 200,
            description = "Advisory (live, simulated, or fallback)",
            body = AdvisoryDocument
        ),
        (status = 400, description = "Malformed request", body = ApiError)
    ),
    tag = "advisory"
)]
pub async fn advisory(
    State(state): State<AppState>,
    AppJson(req): AppJson<AdvisoryRequest>,
) -> Result<Json<AdvisoryDocument>, AppError> {
    validate_classification(&req.label, req.confidence)?;

    let document = state
        .advisor
        .generate_advisory(&req.label, req.confidence)
        .await;
    Ok(Json(document))
}

/// Follow-up chat grounded in the lesion's risk context.
#[utoipa::path(
    post,
    path = "/api/advisory/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat reply (live, simulated, or apology)", body = ChatReply),
        (status = 400, description = "Malformed request", body = ApiError)
    ),
    tag = "advisory"
)]
pub async fn advisory_chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    validate_classification(&req.label, req.confidence)?;

    tracing::debug!(turns = req.history.len(), "Advisory chat request");
    let reply = state
        .advisor
        .continue_chat(&req.label, req.confidence, &req.history)
        .await;
    Ok(Json(reply))
}
