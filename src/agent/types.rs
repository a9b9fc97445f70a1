//! Agent decision types
//!
//! Defines the snapshot threaded through one decision cycle and the
//! request/response shapes of the decision interface.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Actions
// =============================================================================

/// Action an agent settles on after reasoning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentAction {
    #[default]
    Idle,
    Working,
    Communicating,
}

impl AgentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Communicating => "communicating",
        }
    }
}

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Transient state of one agent for the duration of a decision cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: i64,
    /// 2-D or 3-D coordinate
    pub position: Vec<f64>,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub action: AgentAction,
    #[serde(default)]
    pub nearby_agents: Vec<i64>,
}

impl AgentSnapshot {
    /// Fresh snapshot: idle, nothing observed or reasoned yet
    pub fn new(agent_id: i64, position: Vec<f64>, nearby_agents: Vec<i64>) -> Self {
        Self {
            agent_id,
            position,
            nearby_agents,
            ..Default::default()
        }
    }

    pub fn neighbor_count(&self) -> usize {
        self.nearby_agents.len()
    }

    /// Position rendered as a bracketed float list, e.g. `[0.0, 1.5]`
    pub fn position_label(&self) -> String {
        format!("{:?}", self.position)
    }
}

// =============================================================================
// Decision interface
// =============================================================================

/// Input of the decision interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub agent_id: i64,
    pub position: Vec<f64>,
    #[serde(default)]
    pub nearby_agents: Vec<i64>,
}

/// Output of the decision interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub agent_id: i64,
    pub action: AgentAction,
    pub reasoning: String,
    pub observations: Vec<String>,
}

impl From<DecisionRequest> for AgentSnapshot {
    fn from(request: DecisionRequest) -> Self {
        Self::new(request.agent_id, request.position, request.nearby_agents)
    }
}

impl From<AgentSnapshot> for DecisionResponse {
    fn from(state: AgentSnapshot) -> Self {
        Self {
            agent_id: state.agent_id,
            action: state.action,
            reasoning: state.reasoning,
            observations: state.observations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&AgentAction::Communicating).unwrap();
        assert_eq!(json, "\"communicating\"");
        let action: AgentAction = serde_json::from_str("\"working\"").unwrap();
        assert_eq!(action, AgentAction::Working);
        assert_eq!(AgentAction::default(), AgentAction::Idle);
    }

    #[test]
    fn test_position_label() {
        let state = AgentSnapshot::new(1, vec![0.0, -2.5], vec![]);
        assert_eq!(state.position_label(), "[0.0, -2.5]");

        let state = AgentSnapshot::new(1, vec![1.0, 2.0, 3.0], vec![]);
        assert_eq!(state.position_label(), "[1.0, 2.0, 3.0]");
    }

    #[test]
    fn test_decision_request_defaults() {
        let request: DecisionRequest =
            serde_json::from_str(r#"{"agent_id": 7, "position": [1.0, 2.0]}"#).unwrap();
        assert!(request.nearby_agents.is_empty());

        let state = AgentSnapshot::from(request);
        assert_eq!(state.agent_id, 7);
        assert_eq!(state.action, AgentAction::Idle);
        assert!(state.observations.is_empty());
        assert!(state.reasoning.is_empty());
    }
}
