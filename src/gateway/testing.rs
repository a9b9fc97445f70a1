//! In-process fake OpenClaw Gateway for tests

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub(crate) struct FakeState {
    pub health_status: StatusCode,
    pub sessions_status: StatusCode,
    pub sessions_body: Value,
    pub last_authorization: Option<String>,
    pub sessions_hits: usize,
    pub sessions_delay: Option<Duration>,
}

type Shared = Arc<Mutex<FakeState>>;

/// Axum server answering `/health` and `/api/v1/sessions`
pub(crate) struct FakeGateway {
    pub url: String,
    state: Shared,
}

impl FakeGateway {
    /// Start a healthy gateway serving `sessions_body`
    pub async fn start(sessions_body: Value) -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            health_status: StatusCode::OK,
            sessions_status: StatusCode::OK,
            sessions_body,
            last_authorization: None,
            sessions_hits: 0,
            sessions_delay: None,
        }));

        let app = Router::new()
            .route("/health", get(health))
            .route("/api/v1/sessions", get(sessions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn set_health_status(&self, status: StatusCode) {
        self.state.lock().unwrap().health_status = status;
    }

    pub fn set_sessions_status(&self, status: StatusCode) {
        self.state.lock().unwrap().sessions_status = status;
    }

    pub fn set_sessions_body(&self, body: Value) {
        self.state.lock().unwrap().sessions_body = body;
    }

    /// Hold every sessions response for `delay` before answering
    pub fn set_sessions_delay(&self, delay: Duration) {
        self.state.lock().unwrap().sessions_delay = Some(delay);
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().unwrap().last_authorization.clone()
    }

    pub fn sessions_hits(&self) -> usize {
        self.state.lock().unwrap().sessions_hits
    }
}

async fn health(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    state.last_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (state.health_status, Json(json!({"status": "ok", "uptime": 12})))
}

async fn sessions(State(state): State<Shared>) -> impl IntoResponse {
    let (status, body, delay) = {
        let mut state = state.lock().unwrap();
        state.sessions_hits += 1;
        (
            state.sessions_status,
            state.sessions_body.clone(),
            state.sessions_delay,
        )
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    (status, Json(body))
}

/// URL of a local port with nothing listening on it
pub(crate) fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Two sessions, three agents, in a known order
pub(crate) fn sample_sessions() -> Value {
    json!({
        "sessions": [
            {
                "id": "s-1",
                "key": "main",
                "kind": "direct",
                "model": "claude-sonnet",
                "updated_at": 1700000000.5,
                "agents": [
                    {"id": "1", "name": "planner", "state": "thinking", "position": [-2.0, 0.0],
                     "model": "claude-sonnet", "channel": "slack", "reasoning": "drafting plan",
                     "nearby_agents": ["2"]},
                    {"id": "2", "name": "builder", "state": "WORKING", "position": [0.0, 0.0],
                     "nearby_agents": ["1", "reviewer"]}
                ]
            },
            {
                "id": "s-2",
                "key": "group:ops",
                "kind": "group",
                "model": "gpt-4o",
                "agents": [
                    {"id": "reviewer", "name": "reviewer", "state": "sleeping", "position": [2.0, 0.0, 1.0]}
                ]
            }
        ]
    })
}
