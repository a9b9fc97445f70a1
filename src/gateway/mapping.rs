//! Gateway agent → visualization record mapping
//!
//! Pure functions. Numeric ids pass through; anything else is hashed into
//! `[0, HASHED_ID_RANGE)`. Distinct string ids may collide and nothing
//! detects it.

use crate::gateway::types::{GatewayAgent, VisualState, VisualizationAgent};
use sha2::{Digest, Sha256};

/// Upper bound (exclusive) for ids derived from non-numeric strings
pub const HASHED_ID_RANGE: u64 = 1000;

/// Map a gateway agent into the visualization shape
pub fn map_to_visualization(agent: &GatewayAgent) -> VisualizationAgent {
    VisualizationAgent {
        id: map_agent_id(&agent.id),
        position: agent.position.clone(),
        state: map_state(&agent.state),
        nearby_agents: agent
            .nearby_agents
            .iter()
            .map(String::as_str)
            .map(map_agent_id)
            .collect(),
        reasoning: agent.reasoning.clone(),
        name: agent.name.clone(),
        model: agent.model.clone(),
        channel: agent.channel.clone(),
    }
}

/// Numeric id for a gateway agent id
pub fn map_agent_id(id: &str) -> i64 {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(value) = id.parse::<i64>() {
            return value;
        }
    }
    hashed_id(id)
}

fn hashed_id(id: &str) -> i64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % HASHED_ID_RANGE) as i64
}

/// Visualization state for a gateway state label (case-insensitive)
pub fn map_state(state: &str) -> VisualState {
    match state.to_lowercase().as_str() {
        "idle" => VisualState::Idle,
        "working" => VisualState::Working,
        "thinking" | "reasoning" => VisualState::Reasoning,
        "communicating" => VisualState::Communicating,
        "error" => VisualState::Error,
        _ => VisualState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids() {
        assert_eq!(map_agent_id("42"), 42);
        assert_eq!(map_agent_id("0"), 0);
        assert_eq!(map_agent_id("007"), 7);
    }

    #[test]
    fn test_hashed_ids_are_stable_and_bounded() {
        let long = "x".repeat(200);
        for id in ["agent-alpha", "-5", "4.2", "", long.as_str(), "99999999999999999999999"] {
            let first = map_agent_id(id);
            assert!((0..1000).contains(&first), "{} -> {}", id, first);
            for _ in 0..3 {
                assert_eq!(map_agent_id(id), first);
            }
        }
    }

    #[test]
    fn test_state_table() {
        let cases = [
            ("idle", VisualState::Idle),
            ("working", VisualState::Working),
            ("thinking", VisualState::Reasoning),
            ("reasoning", VisualState::Reasoning),
            ("communicating", VisualState::Communicating),
            ("error", VisualState::Error),
        ];
        for (input, expected) in cases {
            assert_eq!(map_state(input), expected);
            assert_eq!(map_state(&input.to_uppercase()), expected);
        }
        assert_eq!(map_state("Thinking"), VisualState::Reasoning);
    }

    #[test]
    fn test_unknown_state_falls_back_to_idle() {
        for input in ["", "sleeping", "moving", "idle ", "ERR"] {
            assert_eq!(map_state(input), VisualState::Idle);
        }
    }

    #[test]
    fn test_map_to_visualization() {
        let agent = GatewayAgent {
            id: "12".to_string(),
            name: "builder".to_string(),
            state: "THINKING".to_string(),
            position: vec![1.0, 2.0, 3.0],
            model: "claude-sonnet".to_string(),
            channel: "telegram".to_string(),
            reasoning: Some("planning next step".to_string()),
            nearby_agents: vec!["3".to_string(), "scout".to_string()],
            last_updated: 1_700_000_000.0,
        };

        let mapped = map_to_visualization(&agent);
        assert_eq!(mapped.id, 12);
        assert_eq!(mapped.state, VisualState::Reasoning);
        assert_eq!(mapped.position, vec![1.0, 2.0, 3.0]);
        assert_eq!(mapped.nearby_agents[0], 3);
        assert_eq!(mapped.nearby_agents[1], map_agent_id("scout"));
        assert_eq!(mapped.reasoning.as_deref(), Some("planning next step"));
        assert_eq!(mapped.name, "builder");
        assert_eq!(mapped.model, "claude-sonnet");
        assert_eq!(mapped.channel, "telegram");
    }
}
