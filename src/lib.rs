//! ClawViz - Multi-agent visualization backend
//!
//! ClawViz feeds a multi-agent visualization with two kinds of data: a
//! per-agent decision cycle computed locally, and live agent state polled
//! from an OpenClaw Gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ClawViz (axum)                         │
//! │                                                              │
//! │  POST /api/agents/decide        GET /api/agents[/:id]        │
//! │           │                              │                   │
//! │  ┌────────▼─────────┐       ┌────────────▼──────────────┐    │
//! │  │   Agent Cycle    │       │   IntegrationRegistry      │    │
//! │  │ perceive→reason  │       │   └ IntegrationManager     │    │
//! │  │      →act        │       │      ├ poll loop ──► watch │    │
//! │  └──────────────────┘       │      │            └► observers
//! │                             │      └ GatewayClient       │    │
//! │                             └────────────┬──────────────┘    │
//! └──────────────────────────────────────────┼───────────────────┘
//!                                            │ HTTP (Bearer)
//!                                 ┌──────────▼──────────┐
//!                                 │  OpenClaw Gateway   │
//!                                 │  /health            │
//!                                 │  /api/v1/sessions   │
//!                                 └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`agent`]: perceive/reason/act decision cycle
//! - [`gateway`]: OpenClaw client, agent mapping, integration manager
//! - [`api`]: HTTP endpoints for the visualization frontend
//! - [`config`]: Configuration management

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod gateway;

pub use config::ClawVizConfig;
pub use error::{Error, Result};
