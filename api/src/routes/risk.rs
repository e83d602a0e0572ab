use axum::routing::post;
use axum::{Json, Router};
use melascope_core::classification::ClassificationResult;
use melascope_core::error::ApiError;
use melascope_core::risk::RiskProfile;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::routes::validate_classification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/risk-profile", post(risk_profile))
}

/// Deterministic risk profile for a classifier result. No LLM involved.
#[utoipa::path(
    post,
    path = "/api/risk-profile",
    request_body = ClassificationResult,
    responses(
        (status = 200, description = "Risk profile", body = RiskProfile),
        (status = 400, description = "Malformed classifier result", body = ApiError)
    ),
    tag = "advisory"
)]
pub async fn risk_profile(
    AppJson(req): AppJson<ClassificationResult>,
) -> Result<Json<RiskProfile>, AppError> {
    validate_classification(&req.label, req.confidence)?;
    Ok(Json(req.risk_profile()))
}
