//! Transaction records, outcomes and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::quorum::{QuorumError, QuorumResult};
use crate::transaction::hashing::{hash_string, transaction_hash};

/// Wire version sent with every transaction.
pub const TRANSACTION_VERSION: &str = "1.0";

/// Kind of transaction, serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum TransactionType {
    Send,
    Data,
    SmartContract,
}

impl TransactionType {
    pub fn code(&self) -> u32 {
        match self {
            TransactionType::Send => 0,
            TransactionType::Data => 10,
            TransactionType::SmartContract => 1000,
        }
    }
}

impl From<TransactionType> for u32 {
    fn from(kind: TransactionType) -> Self {
        kind.code()
    }
}

impl TryFrom<u32> for TransactionType {
    type Error = String;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TransactionType::Send),
            10 => Ok(TransactionType::Data),
            1000 => Ok(TransactionType::SmartContract),
            other => Err(format!("unknown transaction type {}", other)),
        }
    }
}

/// Identity and key material of the submitting wallet.
#[derive(Clone, Copy)]
pub struct Sender<'a> {
    pub client_id: &'a str,
    pub public_key: &'a str,
    pub private_key: &'a str,
}

impl fmt::Debug for Sender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("client_id", &self.client_id)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// One submission attempt.
///
/// Hashes are computed once in [`Transaction::build`]; the timestamp is part
/// of the signed hash and is never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub client_id: String,
    pub public_key: String,
    pub to_client_id: String,
    pub value: i64,
    pub payload: String,
    pub transaction_type: TransactionType,
    pub creation_date: i64,
    pub payload_hash: String,
    pub hash: String,
    pub signature: Option<String>,
}

impl Transaction {
    /// Build an unsigned transaction with its derived hashes.
    pub fn build(
        sender: &Sender<'_>,
        to_client_id: &str,
        value: i64,
        payload: &str,
        transaction_type: TransactionType,
        creation_date: i64,
    ) -> Result<Self, TransactionError> {
        if value < 0 {
            return Err(TransactionError::InvalidAmount(value));
        }

        let payload_hash = hash_string(payload);
        let hash = transaction_hash(
            creation_date,
            sender.client_id,
            to_client_id,
            value,
            &payload_hash,
        );

        Ok(Self {
            client_id: sender.client_id.to_string(),
            public_key: sender.public_key.to_string(),
            to_client_id: to_client_id.to_string(),
            value,
            payload: payload.to_string(),
            transaction_type,
            creation_date,
            payload_hash,
            hash,
            signature: None,
        })
    }

    /// Attach a signature after checking its length.
    pub fn attach_signature(
        &mut self,
        signature: String,
        expected_len: usize,
    ) -> Result<(), TransactionError> {
        if signature.len() != expected_len {
            return Err(TransactionError::SigningFailed(format!(
                "signature has length {}, expected {}",
                signature.len(),
                expected_len
            )));
        }
        self.signature = Some(signature);
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// JSON body nodes expect on submission. Fails for unsigned transactions.
    pub fn to_wire(&self) -> Result<Value, TransactionError> {
        let signature = self
            .signature
            .as_deref()
            .ok_or_else(|| TransactionError::SigningFailed("transaction is not signed".into()))?;

        let record = WireRecord {
            client_id: &self.client_id,
            public_key: &self.public_key,
            transaction_value: self.value,
            transaction_data: &self.payload,
            transaction_type: self.transaction_type.code(),
            creation_date: self.creation_date,
            to_client_id: &self.to_client_id,
            hash: &self.hash,
            transaction_fee: 0,
            signature,
            version: TRANSACTION_VERSION,
        };

        serde_json::to_value(record).map_err(|e| TransactionError::Encode(e.to_string()))
    }
}

#[derive(Serialize)]
struct WireRecord<'a> {
    client_id: &'a str,
    public_key: &'a str,
    transaction_value: i64,
    transaction_data: &'a str,
    transaction_type: u32,
    creation_date: i64,
    to_client_id: &'a str,
    hash: &'a str,
    transaction_fee: i64,
    signature: &'a str,
    version: &'a str,
}

/// A signed transaction and the round that accepted it.
#[derive(Debug, Clone)]
pub struct SubmittedTransaction {
    pub transaction: Transaction,
    pub result: QuorumResult,
}

impl SubmittedTransaction {
    pub fn hash(&self) -> &str {
        &self.transaction.hash
    }
}

/// Reason reported when the confirmation deadline passes.
pub const TIMEOUT_REASON: &str = "timeout";

/// Terminal state of confirmation polling.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    /// A query round returned the transaction with a ledger block hash.
    Confirmed { hash: String, record: Value },
    /// Not observed; the submission status is unknown.
    Unconfirmed { reason: String },
}

impl ConfirmationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed { .. })
    }

    pub fn timeout() -> Self {
        ConfirmationOutcome::Unconfirmed {
            reason: TIMEOUT_REASON.to_string(),
        }
    }
}

/// Errors that can occur while submitting a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid amount {0}: must be >= 0")]
    InvalidAmount(i64),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error(transparent)]
    Quorum(#[from] QuorumError),

    #[error("failed to encode transaction: {0}")]
    Encode(String),
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
