//! In-process secp256k1 signing.
//!
//! # Security
//! - The key is parsed per call and dropped right after signing
//! - Keys are never logged or serialized

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;

use crate::signer::{Signer, SignerError};

/// r, s, v as lowercase hex.
pub const SIGNATURE_HEX_LEN: usize = 130;

/// Signer backed by alloy's local private key signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalKeySigner;

impl LocalKeySigner {
    pub fn new() -> Self {
        Self
    }

    fn parse_key(private_key_hex: &str) -> Result<PrivateKeySigner, SignerError> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        key_hex
            .parse()
            .map_err(|e| SignerError::InvalidKey(format!("{}", e)))
    }

    /// Hex address of the key, useful as a stable account label.
    pub fn address(private_key_hex: &str) -> Result<String, SignerError> {
        Ok(Self::parse_key(private_key_hex)?.address().to_string())
    }
}

#[async_trait]
impl Signer for LocalKeySigner {
    async fn sign(&self, private_key: &str, hash_hex: &str) -> Result<String, SignerError> {
        let signer = Self::parse_key(private_key)?;
        let hash: B256 = hash_hex
            .parse()
            .map_err(|e| SignerError::InvalidHash(format!("'{}': {}", hash_hex, e)))?;

        let signature = signer
            .sign_hash_sync(&hash)
            .map_err(|e| SignerError::Process(format!("signing failed: {}", e)))?;

        Ok(hex::encode(signature.as_bytes()))
    }

    fn signature_len(&self) -> usize {
        SIGNATURE_HEX_LEN
    }
}
