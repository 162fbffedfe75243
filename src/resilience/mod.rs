//! Resilience helpers shared by the quorum engine and confirmation polling.
//!
//! # Data Flow
//! ```text
//! Caller supplies a Deadline
//!     → quorum round is bounded by it (outstanding nodes cancelled)
//!     → confirmation polling sleeps via backoff.rs, never past it
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline; per-node timeouts come from config
//! - Jittered poll intervals keep many wallets from polling in lockstep

pub mod backoff;
pub mod deadline;

pub use backoff::poll_delay;
pub use deadline::Deadline;
