//! HTTP API for the visualization frontend
//!
//! ## Endpoint Map
//!
//! | Route                     | Description                                   |
//! |---------------------------|-----------------------------------------------|
//! | `GET /`                   | Service banner                                |
//! | `GET /api/health`         | Liveness plus integration state               |
//! | `GET /api/agents`         | Gateway agents in visualization shape         |
//! | `GET /api/agents/:id`     | One visualization agent by numeric id         |
//! | `POST /api/agents/decide` | Run one perceive/reason/act cycle             |

use crate::agent::{self, DecisionRequest};
use crate::error::{to_json, Error};
use crate::gateway::{IntegrationManager, IntegrationRegistry};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub integration: Arc<IntegrationRegistry>,
}

impl AppState {
    pub fn new(integration: Arc<IntegrationRegistry>) -> Self {
        Self { integration }
    }
}

/// Build the HTTP application
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/agents", get(list_agents))
        .route("/api/agents/decide", post(decide_agent_action))
        .route("/api/agents/:id", get(get_agent))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Agent Visualization Backend",
        "status": "healthy",
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    integration: String,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let integration = match state.integration.current().await {
        Some(manager) => manager.state().await.as_str(),
        None => "not_started",
    };
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        integration: integration.to_string(),
    })
}

async fn decide_agent_action(Json(request): Json<DecisionRequest>) -> impl IntoResponse {
    Json(agent::decide(request))
}

async fn list_agents(State(state): State<AppState>) -> impl IntoResponse {
    let manager = match running_integration(&state).await {
        Ok(manager) => manager,
        Err(response) => return response,
    };
    match manager.get_agents_for_visualization().await {
        Ok(agents) => (StatusCode::OK, Json(to_json(agents))),
        Err(e) => gateway_error(e),
    }
}

async fn get_agent(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let manager = match running_integration(&state).await {
        Ok(manager) => manager,
        Err(response) => return response,
    };
    match manager.get_agents_for_visualization().await {
        Ok(agents) => match agents.into_iter().find(|a| a.id == id) {
            Some(agent) => (StatusCode::OK, Json(to_json(agent))),
            None => error_response(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("Agent {} not found", id),
            ),
        },
        Err(e) => gateway_error(e),
    }
}

// =============================================================================
// Helpers
// =============================================================================

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

async fn running_integration(
    state: &AppState,
) -> std::result::Result<Arc<IntegrationManager>, ErrorResponse> {
    state.integration.current().await.ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "INTEGRATION_UNAVAILABLE",
            "OpenClaw integration is not running",
        )
    })
}

fn gateway_error(e: Error) -> ErrorResponse {
    let status = match e {
        Error::NotConnected => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    };
    error_response(status, "GATEWAY_ERROR", &e.to_string())
}

fn error_response(status: StatusCode, code: &str, message: &str) -> ErrorResponse {
    (
        status,
        Json(serde_json::json!({"error": {"code": code, "message": message}})),
    )
}
