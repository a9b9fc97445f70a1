//! Perceive → reason → act decision cycle
//!
//! One invocation makes exactly one pass through the three stages. Each
//! stage takes the snapshot by value and hands back the updated snapshot;
//! branching happens only inside a stage, never between stages.

use crate::agent::types::{AgentAction, AgentSnapshot, DecisionRequest, DecisionResponse};
use std::fmt;

/// Stage of a decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Perceiving,
    Reasoning,
    Acting,
    Done,
}

impl CycleStage {
    /// Unconditional successor; `Done` is terminal
    pub fn next(self) -> Self {
        match self {
            Self::Perceiving => Self::Reasoning,
            Self::Reasoning => Self::Acting,
            Self::Acting | Self::Done => Self::Done,
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Perceiving => "perceiving",
            Self::Reasoning => "reasoning",
            Self::Acting => "acting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Rebuild the agent's observations from what it can see.
pub fn perceive(mut state: AgentSnapshot) -> AgentSnapshot {
    let n = state.neighbor_count();
    state.observations = if n > 0 {
        vec![
            format!("Detected {} nearby agents", n),
            format!("Current position: {}", state.position_label()),
            format!("Current state: {}", state.action),
        ]
    } else {
        vec![
            "No nearby agents detected".to_string(),
            format!("Current position: {}", state.position_label()),
            "Environment appears quiet".to_string(),
        ]
    };
    state
}

/// Classify the neighbor count and pick the next action.
pub fn reason(mut state: AgentSnapshot) -> AgentSnapshot {
    let (reasoning, action) = match state.neighbor_count() {
        0 => (
            "No agents nearby, continue current activity".to_string(),
            AgentAction::Idle,
        ),
        1 => (
            "Single agent nearby, could collaborate or communicate".to_string(),
            AgentAction::Working,
        ),
        n => (
            format!(
                "Multiple agents ({}) detected, initiate group communication",
                n
            ),
            AgentAction::Communicating,
        ),
    };
    state.reasoning = reasoning;
    state.action = action;
    state
}

/// Execute the decided action.
///
/// Currently the identity transform for every action. This is where
/// side effects belong once they exist: dispatching messages to neighbors
/// for `Communicating`, running a task step for `Working`.
pub fn act(state: AgentSnapshot) -> AgentSnapshot {
    state
}

/// Run one full cycle: perceive, then reason, then act.
pub fn run_cycle(initial: AgentSnapshot) -> AgentSnapshot {
    let mut stage = CycleStage::Perceiving;
    let mut state = initial;

    while stage != CycleStage::Done {
        tracing::trace!(agent_id = state.agent_id, stage = %stage, "Agent cycle stage");
        state = match stage {
            CycleStage::Perceiving => perceive(state),
            CycleStage::Reasoning => reason(state),
            CycleStage::Acting => act(state),
            CycleStage::Done => state,
        };
        stage = stage.next();
    }

    tracing::debug!(
        agent_id = state.agent_id,
        action = %state.action,
        neighbors = state.neighbor_count(),
        "Agent cycle completed"
    );
    state
}

/// Answer a decision request with one cycle.
pub fn decide(request: DecisionRequest) -> DecisionResponse {
    run_cycle(AgentSnapshot::from(request)).into()
}
