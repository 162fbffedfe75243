//! Wallet key file loading.
//!
//! # Security
//! - Private keys and mnemonics are excluded from `Debug` output
//! - This module only reads key files; it never writes them
//! - Key types implement `Deserialize` only, so nothing can serialize a secret

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::wallet::WalletError;

/// One public/private key pair.
#[derive(Clone, Default, Deserialize)]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Contents of a wallet key file. Every field may be missing.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalletKeys {
    pub client_id: Option<String>,
    pub client_key: Option<String>,
    pub keys: Vec<KeyPair>,
    pub mnemonics: Option<String>,
    pub version: Option<String>,
    pub date_created: Option<Value>,
}

impl WalletKeys {
    pub fn from_json(content: &str) -> Result<Self, WalletError> {
        serde_json::from_str(content).map_err(|e| WalletError::KeyFile(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::KeyFile(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// The first key pair, which is the one used for signing.
    pub fn primary(&self) -> Option<&KeyPair> {
        self.keys.first()
    }
}

impl fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeys")
            .field("client_id", &self.client_id)
            .field("client_key", &self.client_key)
            .field("keys", &self.keys)
            .field("version", &self.version)
            .field("date_created", &self.date_created)
            .finish_non_exhaustive()
    }
}
