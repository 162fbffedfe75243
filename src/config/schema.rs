//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Node base URLs per role.
    pub network: NetworkConfig,

    /// Fan-out and agreement settings.
    pub quorum: QuorumConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Which signer backend to use.
    pub signer: SignerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node topology.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NetworkConfig {
    /// Transaction-accepting nodes.
    pub miners: Vec<String>,

    /// Ledger-query nodes.
    pub sharders: Vec<String>,
}

/// Quorum reduction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuorumConfig {
    /// Fraction of configured nodes that must agree, in (0, 1].
    pub threshold: f64,

    /// Per-node request timeout in milliseconds.
    pub node_timeout_ms: u64,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            threshold: 0.51,
            node_timeout_ms: 5000,
        }
    }
}

/// Confirmation polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Base delay between poll rounds in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound for the (backed off) delay in milliseconds.
    pub max_poll_interval_ms: u64,

    /// Default confirmation budget in seconds.
    pub deadline_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            max_poll_interval_ms: 2000,
            deadline_secs: 30,
        }
    }
}

/// Signer backend selection.
///
/// `Local` is the default so a bare config works out of the box, but its
/// 130-character secp256k1 signatures are not the scheme production miners
/// verify. Deployments against a live network set `kind = "process"` and point
/// `program` at the network's own signing tool, which emits 64 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignerKind {
    /// In-process secp256k1 signing, for development and test networks.
    #[default]
    Local,
    /// Signing delegated to an external program; use this in production.
    Process,
}

/// Signer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    pub kind: SignerKind,

    /// Program to run for `kind = "process"`.
    pub program: String,

    /// Leading arguments; the private key and hash are appended.
    pub args: Vec<String>,

    /// Expected signature length in characters for the process signer.
    /// Defaults to 64, the length the network's signing tool produces.
    pub signature_len: usize,

    /// Process signer timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            kind: SignerKind::Local,
            program: String::new(),
            args: Vec::new(),
            signature_len: 64,
            timeout_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
