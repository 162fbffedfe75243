//! Signer adapter boundary.
//!
//! # Data Flow
//! ```text
//! TransactionLifecycle
//!     → Signer::sign(private key, hex hash)
//!         local.rs   (in-process secp256k1 via alloy)
//!         process.rs (external program, stdout = signature)
//!     → signature string, length checked by the caller
//! ```
//!
//! # Security Constraints
//! - Private keys are passed through, never logged or stored
//! - The lifecycle treats the signer as opaque; swapping backends needs no
//!   change outside this module

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{SignerConfig, SignerKind};

pub mod local;
pub mod process;

pub use local::LocalKeySigner;
pub use process::ProcessSigner;

/// Errors reported by a signer backend.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("signer process failed: {0}")]
    Process(String),

    #[error("signer timed out after {0} ms")]
    Timeout(u64),
}

/// Capability that turns (private key, hex digest) into a signature.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign a hex-encoded digest.
    async fn sign(&self, private_key: &str, hash_hex: &str) -> Result<String, SignerError>;

    /// Exact length of a well-formed signature string.
    fn signature_len(&self) -> usize;
}

/// Build the configured signer backend.
pub fn from_config(config: &SignerConfig) -> Arc<dyn Signer> {
    match config.kind {
        SignerKind::Local => Arc::new(LocalKeySigner::new()),
        SignerKind::Process => Arc::new(ProcessSigner::new(
            config.program.clone(),
            config.args.clone(),
            config.signature_len,
            Duration::from_millis(config.timeout_ms),
        )),
    }
}
