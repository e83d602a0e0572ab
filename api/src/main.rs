use std::net::SocketAddr;

use axum::Router;
use melascope_core::advisory::Advisor;
use melascope_core::config::{AdvisorConfig, ExecutionMode};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod middleware;
mod routes;
mod state;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Melascope DX API",
        version = "0.1.0",
        description = "Risk profiles and safety-constrained AI advisories for skin-lesion classifier results. Not a diagnosis."
    ),
    paths(
        routes::health::health_check,
        routes::risk::risk_profile,
        routes::advisory::advisory,
        routes::advisory::advisory_chat,
    ),
    components(schemas(
        HealthResponse,
        melascope_core::error::ApiError,
        melascope_core::config::ExecutionMode,
        melascope_core::classification::ClassificationResult,
        melascope_core::risk::RiskTier,
        melascope_core::risk::RiskProfile,
        melascope_core::message::TurnRole,
        melascope_core::message::ChatTurn,
        melascope_core::advisory::AdvisoryDocument,
        melascope_core::advisory::ChatReply,
        routes::advisory::AdvisoryRequest,
        routes::advisory::ChatRequest,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub execution_mode: ExecutionMode,
}

fn app(app_state: state::AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::risk::router())
        .merge(routes::advisory::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer()),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "melascope_api=debug,melascope_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AdvisorConfig::from_env().expect("Invalid LLM configuration");
    tracing::info!(
        execution_mode = config.mode.as_str(),
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        output_screen = config.output_screen,
        "Advisory configuration loaded"
    );
    if config.mode != ExecutionMode::Live {
        tracing::warn!("No live LLM credential; advisories are simulated");
    }

    let app_state = state::AppState {
        advisor: Advisor::from_config(&config),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Melascope API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app(app_state))
        .await
        .expect("Server error");
}
