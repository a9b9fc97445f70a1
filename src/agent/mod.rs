//! Agent module: perceive/reason/act decision cycle
//!
//! ## Architecture
//!
//! ```text
//! DecisionRequest ──► AgentSnapshot ──► perceive ──► reason ──► act ──► DecisionResponse
//!                                        (observations) (action,    (hook for
//!                                                        reasoning)  side effects)
//! ```

pub mod cycle;
pub mod types;

pub use cycle::{act, decide, perceive, reason, run_cycle, CycleStage};
pub use types::{AgentAction, AgentSnapshot, DecisionRequest, DecisionResponse};
