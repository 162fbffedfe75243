//! Fan-out/quorum request subsystem.
//!
//! # Data Flow
//! ```text
//! QuorumRequest (role, endpoint, method, body, fallback, expected hash)
//!     → engine.rs (one future per node, per-node timeout, round deadline)
//!     → NodeOutcome per node (success / http error / invalid body / timeout / network)
//!     → reduce.rs (group equal bodies, apply threshold)
//!     → QuorumResult, or fallback, or QuorumError::QuorumNotReached
//! ```
//!
//! # Design Decisions
//! - Agreement is measured against all configured nodes, not just responders
//! - Submissions are judged per transaction hash: one echoing node suffices
//! - A caller-supplied empty fallback turns "no agreement" into a safe result

pub mod engine;
pub mod reduce;
pub mod types;

pub use engine::QuorumEngine;
pub use types::{NodeOutcome, NodeReport, QuorumError, QuorumRequest, QuorumResult};
