//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Quorum engine, transaction lifecycle, wallet operations produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stderr (wallet-cli)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (role, node, hash) rather than formatted strings
//! - Private keys are never logged
//! - The library installs no recorder; metric calls are no-ops until one is

pub mod logging;
pub mod metrics;
