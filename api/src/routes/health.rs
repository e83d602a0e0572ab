use axum::extract::State;
use axum::{Json, Router, routing::get};
use melascope_core::config::ExecutionMode;

use crate::HealthResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}

/// Health check. Reports the advisory execution mode so operators can tell
/// "no key" from "mock key" from "real key".
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = state.advisor.mode();
    let status = match mode {
        ExecutionMode::Live => "ok",
        ExecutionMode::Mock | ExecutionMode::Unconfigured => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        execution_mode: mode,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use melascope_core::advisory::Advisor;
    use melascope_core::config::AdvisorConfig;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn reports_mock_mode() {
        let state = AppState {
            advisor: Advisor::from_config(&AdvisorConfig::mock()),
        };
        let response = router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["execution_mode"], "mock");
        assert_eq!(json["status"], "degraded");
    }
}
