//! Client-side protocol layer for a quorum-replicated ledger network.
//!
//! # Architecture Overview
//!
//! ```text
//!   wallet (domain operations)
//!      │
//!      ▼
//!   transaction (hash → sign → submit → confirm)
//!      │                  │
//!      │                  ▼
//!      │              signer (local key / external process)
//!      ▼
//!   quorum engine ──────► miners   (transaction role)
//!      │          ──────► sharders (query role)
//!      ▼
//!   reduce (group identical bodies, apply threshold)
//! ```
//!
//! Cross-cutting: `config` (TOML + validation), `observability`
//! (tracing + metrics), `resilience` (poll backoff and deadlines).

pub mod config;
pub mod network;
pub mod observability;
pub mod quorum;
pub mod resilience;
pub mod signer;
pub mod transaction;
pub mod wallet;

pub use config::BridgeConfig;
pub use network::{Network, NodeRole};
pub use quorum::{QuorumEngine, QuorumError, QuorumRequest, QuorumResult};
pub use signer::Signer;
pub use transaction::{ConfirmationOutcome, TransactionLifecycle};
pub use wallet::{Wallet, WalletError};
