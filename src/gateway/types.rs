//! OpenClaw Gateway wire types and visualization records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Gateway → ClawViz (JSON)
// =============================================================================

/// Body of `GET /api/v1/sessions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<GatewaySession>,
}

/// A session grouping agents that share a model and kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySession {
    pub id: String,
    pub key: String,
    pub kind: String,
    pub model: String,
    pub updated_at: f64,
    pub agents: Vec<GatewayAgent>,
}

impl Default for GatewaySession {
    fn default() -> Self {
        Self {
            id: String::new(),
            key: String::new(),
            kind: "unknown".to_string(),
            model: String::new(),
            updated_at: 0.0,
            agents: Vec::new(),
        }
    }
}

/// An agent as reported by the gateway. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayAgent {
    pub id: String,
    pub name: String,
    pub state: String,
    pub position: Vec<f64>,
    pub model: String,
    pub channel: String,
    pub reasoning: Option<String>,
    pub nearby_agents: Vec<String>,
    /// Epoch seconds
    pub last_updated: f64,
}

impl Default for GatewayAgent {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            state: String::new(),
            position: vec![0.0, 0.0],
            model: String::new(),
            channel: String::new(),
            reasoning: None,
            nearby_agents: Vec::new(),
            last_updated: 0.0,
        }
    }
}

/// Outcome of a sessions fetch.
///
/// `Available` with an empty list means the gateway answered with no
/// sessions; `Unreachable` means the request or its decoding failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionsFetch {
    Available(Vec<GatewaySession>),
    Unreachable { reason: String },
}

impl SessionsFetch {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Collapse to a session list; unreachable becomes empty.
    pub fn into_sessions(self) -> Vec<GatewaySession> {
        match self {
            Self::Available(sessions) => sessions,
            Self::Unreachable { .. } => Vec::new(),
        }
    }
}

// =============================================================================
// ClawViz → Visualization (JSON)
// =============================================================================

/// State label understood by the visualization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    #[default]
    Idle,
    Working,
    Reasoning,
    Communicating,
    Error,
}

impl VisualState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Reasoning => "reasoning",
            Self::Communicating => "communicating",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready agent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationAgent {
    pub id: i64,
    pub position: Vec<f64>,
    pub state: VisualState,
    pub nearby_agents: Vec<i64>,
    pub reasoning: Option<String>,
    pub name: String,
    pub model: String,
    pub channel: String,
}

/// One poll tick's worth of visualization agents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentsSnapshot {
    pub agents: Vec<VisualizationAgent>,
    pub fetched_at: DateTime<Utc>,
    /// False when the sessions fetch failed and `agents` is empty for that reason
    pub gateway_reachable: bool,
    /// 0 until the first tick is delivered
    pub tick: u64,
}

impl Default for AgentsSnapshot {
    fn default() -> Self {
        Self {
            agents: Vec::new(),
            fetched_at: DateTime::<Utc>::default(),
            gateway_reachable: false,
            tick: 0,
        }
    }
}
