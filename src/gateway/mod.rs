//! OpenClaw Gateway integration
//!
//! HTTP client for the gateway's session API, the mapping from gateway
//! agents to visualization records, and the background poll loop that
//! keeps those records fresh.

pub mod client;
pub mod integration;
pub mod mapping;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use client::{GatewayClient, GatewayClientConfig};
pub use integration::{AgentsObserver, IntegrationManager, IntegrationRegistry, IntegrationState};
pub use mapping::{map_agent_id, map_state, map_to_visualization};
pub use types::{
    AgentsSnapshot, GatewayAgent, GatewaySession, SessionsFetch, VisualState, VisualizationAgent,
};
