//! Transaction building, signing, submission and confirmation polling.
//!
//! # Responsibilities
//! - Build the canonical record and its hashes
//! - Sign through the configured signer, rejecting malformed signatures
//! - Submit to miners, accepting any node that echoes the hash
//! - Poll sharders until the hash shows up in a block or the deadline passes

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::ConfirmationConfig;
use crate::network::NodeRole;
use crate::observability::metrics;
use crate::quorum::{QuorumEngine, QuorumError, QuorumRequest};
use crate::resilience::{poll_delay, Deadline};
use crate::signer::Signer;
use crate::transaction::types::{
    ConfirmationOutcome, Sender, SubmittedTransaction, Transaction, TransactionError,
    TransactionResult, TransactionType,
};

/// Miner endpoint accepting new transactions.
pub const PUT_TRANSACTION: &str = "/v1/transaction/put";

/// Sharder endpoint returning a transaction's block confirmation.
pub const GET_CONFIRMATION: &str = "/v1/transaction/get/confirmation";

/// Builds, signs, submits and confirms transactions.
#[derive(Clone)]
pub struct TransactionLifecycle {
    engine: QuorumEngine,
    signer: Arc<dyn Signer>,
    config: ConfirmationConfig,
}

impl TransactionLifecycle {
    pub fn new(engine: QuorumEngine, signer: Arc<dyn Signer>, config: ConfirmationConfig) -> Self {
        Self {
            engine,
            signer,
            config,
        }
    }

    pub fn engine(&self) -> &QuorumEngine {
        &self.engine
    }

    /// Deadline for `confirm` using the configured budget.
    pub fn default_deadline(&self) -> Deadline {
        Deadline::after(Duration::from_secs(self.config.deadline_secs))
    }

    /// Sign a built transaction in place.
    pub async fn sign(&self, tx: &mut Transaction, private_key: &str) -> TransactionResult<()> {
        let signature = self
            .signer
            .sign(private_key, &tx.hash)
            .await
            .map_err(|e| TransactionError::SigningFailed(e.to_string()))?;
        tx.attach_signature(signature, self.signer.signature_len())
    }

    /// Build, sign and submit a transaction to the miners.
    ///
    /// Returns once a miner accepted it; durability needs [`Self::confirm`].
    pub async fn submit(
        &self,
        sender: &Sender<'_>,
        to_client_id: &str,
        value: i64,
        payload: &str,
        transaction_type: TransactionType,
    ) -> TransactionResult<SubmittedTransaction> {
        let mut tx = Transaction::build(
            sender,
            to_client_id,
            value,
            payload,
            transaction_type,
            now_unix(),
        )?;
        self.sign(&mut tx, sender.private_key).await?;
        self.submit_signed(tx).await
    }

    /// Submit an already signed transaction.
    pub async fn submit_signed(&self, tx: Transaction) -> TransactionResult<SubmittedTransaction> {
        let body = tx.to_wire()?;

        let request = QuorumRequest::post(NodeRole::Transaction, PUT_TRANSACTION)
            .json(&body)
            .header("Connection", "keep-alive")
            .expect_hash(tx.hash.clone());

        let result = self.engine.send(request).await?;

        tracing::info!(
            hash = %tx.hash,
            to = %tx.to_client_id,
            value = tx.value,
            accepted_by = result.agree_count,
            total = result.total_nodes,
            "Transaction submitted"
        );
        metrics::record_submission();

        Ok(SubmittedTransaction {
            transaction: tx,
            result,
        })
    }

    /// Poll sharders until the transaction is in a block or `deadline` passes.
    ///
    /// Timing out is a normal outcome, not an error: the submission status is
    /// simply unknown.
    pub async fn confirm(&self, hash: &str, deadline: Deadline) -> ConfirmationOutcome {
        let mut attempt: u32 = 0;

        loop {
            let request = QuorumRequest::get(NodeRole::Query, GET_CONFIRMATION)
                .query("hash", hash)
                .empty_fallback(json!({}))
                .deadline(deadline);

            match self.engine.send(request).await {
                Ok(result) if is_confirmation(&result.body, hash) => {
                    tracing::info!(hash = %hash, attempts = attempt + 1, "Transaction confirmed");
                    metrics::record_confirmation("confirmed");
                    return ConfirmationOutcome::Confirmed {
                        hash: hash.to_string(),
                        record: result.body,
                    };
                }
                Ok(_) => {
                    tracing::debug!(hash = %hash, attempt, "Transaction not yet confirmed");
                }
                Err(e @ (QuorumError::NoNodesConfigured(_) | QuorumError::InvalidRequest(_))) => {
                    tracing::warn!(hash = %hash, error = %e, "Confirmation polling cannot proceed");
                    metrics::record_confirmation("unconfirmed");
                    return ConfirmationOutcome::Unconfirmed {
                        reason: e.to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!(hash = %hash, error = %e, "Confirmation poll failed");
                }
            }

            attempt += 1;
            let wait = deadline.clamp(poll_delay(attempt, &self.config));
            if wait.is_zero() || deadline.is_expired() {
                break;
            }
            tokio::time::sleep(wait).await;
            if deadline.is_expired() {
                break;
            }
        }

        tracing::warn!(hash = %hash, attempts = attempt, "Transaction confirmation timed out");
        metrics::record_confirmation("timeout");
        ConfirmationOutcome::timeout()
    }

    /// Submit, then confirm within the configured default deadline.
    pub async fn submit_and_confirm(
        &self,
        sender: &Sender<'_>,
        to_client_id: &str,
        value: i64,
        payload: &str,
        transaction_type: TransactionType,
    ) -> TransactionResult<(SubmittedTransaction, ConfirmationOutcome)> {
        let submitted = self
            .submit(sender, to_client_id, value, payload, transaction_type)
            .await?;
        let outcome = self.confirm(submitted.hash(), self.default_deadline()).await;
        Ok((submitted, outcome))
    }
}

impl std::fmt::Debug for TransactionLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionLifecycle")
            .field("engine", &self.engine)
            .field("signature_len", &self.signer.signature_len())
            .field("config", &self.config)
            .finish()
    }
}

/// Whether a sharder record shows `hash` committed in a block.
pub fn is_confirmation(record: &Value, hash: &str) -> bool {
    let record_hash = record
        .get("hash")
        .and_then(Value::as_str)
        .or_else(|| {
            record
                .get("txn")
                .and_then(|txn| txn.get("hash"))
                .and_then(Value::as_str)
        });

    let block_hash = record
        .get("block_hash")
        .and_then(Value::as_str)
        .unwrap_or_default();

    record_hash == Some(hash) && !block_hash.is_empty()
}

pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
