//! Wallet domain operations.
//!
//! # Data Flow
//! ```text
//! wallet key file → keys.rs (WalletKeys)
//!     → Wallet::ensure_initialized (explicit precondition, no side effects)
//!     → queries: QuorumEngine GET on sharders (with safe empty fallbacks)
//!     → contract calls: payload JSON → TransactionLifecycle submit (+ confirm)
//! ```
//!
//! # Design Decisions
//! - Amounts are integers in the smallest unit; `format_tokens` is for display only
//! - Operations needing durability report `Unconfirmed` instead of assuming success

use serde_json::{json, Value};
use thiserror::Error;

use crate::network::NodeRole;
use crate::quorum::{QuorumEngine, QuorumError, QuorumRequest};
use crate::transaction::lifecycle::now_unix;
use crate::transaction::{
    ConfirmationOutcome, Sender, SubmittedTransaction, TransactionError, TransactionLifecycle,
    TransactionType,
};

pub mod allocation;
pub mod endpoints;
pub mod keys;

pub use allocation::{AllocationOutcome, AllocationParams, PriceRange};
pub use keys::{KeyPair, WalletKeys};

use endpoints::method;

/// Smallest units per token.
pub const TOKEN_UNIT: i64 = 10_000_000_000;

/// Message reported when allocation creation cannot be confirmed.
pub const ALLOCATION_UNCONFIRMED_MESSAGE: &str = "Allocation creation could not be confirmed";

/// Errors from wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet is not initialized: load or recover a wallet with a client id and key pair first")]
    NotInitialized,

    #[error("invalid lock duration {hours}h{minutes}m")]
    InvalidDuration { hours: i64, minutes: i64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid allocation lifetime {0}s")]
    InvalidLifetime(i64),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("wallet file error: {0}")]
    KeyFile(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Quorum(#[from] QuorumError),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Render smallest units as a decimal token amount with 10 places.
pub fn format_tokens(units: i64) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    let unit = TOKEN_UNIT as u64;
    format!("{}{}.{:010}", sign, abs / unit, abs % unit)
}

/// Sharder GET for `endpoint` keyed by the wallet's client id.
fn client_query(endpoint: &str, key: &str, client_id: &str) -> QuorumRequest {
    QuorumRequest::get(NodeRole::Query, endpoint).query(key, client_id)
}

/// Expiration `hours` from `now`, in unix seconds.
pub fn extended_expiration(now: i64, hours: i64) -> WalletResult<i64> {
    let invalid = WalletError::InvalidDuration { hours, minutes: 0 };
    if hours < 0 {
        return Err(invalid);
    }
    hours
        .checked_mul(3600)
        .and_then(|secs| now.checked_add(secs))
        .ok_or(invalid)
}

/// Entries of a pool listing belonging to one allocation.
pub fn filter_by_allocation(pools: &Value, allocation_id: &str) -> Vec<Value> {
    pools
        .get("pools")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter(|pool| pool.get("allocation_id").and_then(Value::as_str) == Some(allocation_id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// A wallet bound to a network through the transaction lifecycle.
#[derive(Debug, Clone)]
pub struct Wallet {
    keys: WalletKeys,
    lifecycle: TransactionLifecycle,
}

impl Wallet {
    pub fn new(keys: WalletKeys, lifecycle: TransactionLifecycle) -> Self {
        Self { keys, lifecycle }
    }

    pub fn keys(&self) -> &WalletKeys {
        &self.keys
    }

    pub fn lifecycle(&self) -> &TransactionLifecycle {
        &self.lifecycle
    }

    fn engine(&self) -> &QuorumEngine {
        self.lifecycle.engine()
    }

    /// Check the wallet can act on the network.
    ///
    /// Requires a client id and a key pair with a private key. Never creates
    /// or recovers a wallet.
    pub fn ensure_initialized(&self) -> WalletResult<Sender<'_>> {
        let client_id = self
            .keys
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(WalletError::NotInitialized)?;
        let pair = self
            .keys
            .primary()
            .filter(|pair| !pair.private_key.is_empty())
            .ok_or(WalletError::NotInitialized)?;

        Ok(Sender {
            client_id,
            public_key: &pair.public_key,
            private_key: &pair.private_key,
        })
    }

    async fn query(&self, mut request: QuorumRequest, fallback: Option<Value>) -> WalletResult<Value> {
        if let Some(fallback) = fallback {
            request = request.empty_fallback(fallback);
        }
        Ok(self.engine().send(request).await?.body)
    }

    async fn execute_smart_contract(
        &self,
        to_client_id: &str,
        payload: &Value,
        value: i64,
    ) -> WalletResult<SubmittedTransaction> {
        let sender = self.ensure_initialized()?;
        let submitted = self
            .lifecycle
            .submit(
                &sender,
                to_client_id,
                value,
                &payload.to_string(),
                TransactionType::SmartContract,
            )
            .await?;
        Ok(submitted)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Balance in the smallest unit. Nodes without the client report zero.
    pub async fn get_balance(&self) -> WalletResult<i64> {
        let sender = self.ensure_initialized()?;
        let body = self
            .query(
                client_query(endpoints::GET_BALANCE, "client_id", sender.client_id),
                Some(json!({"balance": 0})),
            )
            .await?;

        body.get("balance")
            .and_then(Value::as_i64)
            .ok_or_else(|| WalletError::UnexpectedResponse(format!("no balance in {}", body)))
    }

    pub async fn get_user_pools(&self) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        self.query(
            client_query(endpoints::GET_USER_POOLS, "client_id", sender.client_id),
            Some(json!({"pools": {}})),
        )
        .await
    }

    pub async fn get_locked_tokens(&self) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        self.query(
            client_query(endpoints::GET_LOCKED_TOKENS, "client_id", sender.client_id),
            Some(json!({
                "message": "Failed to get locked tokens.",
                "code": "resource_not_found",
                "error": "resource_not_found: can't find user node",
            })),
        )
        .await
    }

    pub async fn get_lock_config(&self) -> WalletResult<Value> {
        self.ensure_initialized()?;
        self.query(QuorumRequest::get(NodeRole::Query, endpoints::GET_LOCK_CONFIG), None)
            .await
    }

    /// Read pool stats, optionally narrowed to one allocation.
    pub async fn get_read_pool_info(&self, allocation_id: Option<&str>) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        let body = self
            .query(
                client_query(endpoints::SC_REST_READPOOL_STATS, "client_id", sender.client_id),
                None,
            )
            .await?;
        Ok(match allocation_id {
            Some(id) => Value::Array(filter_by_allocation(&body, id)),
            None => body,
        })
    }

    /// Write pool stats, optionally narrowed to one allocation.
    pub async fn get_write_pool_info(&self, allocation_id: Option<&str>) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        let body = self
            .query(
                client_query(endpoints::SC_REST_WRITEPOOL_STATS, "client_id", sender.client_id),
                None,
            )
            .await?;
        Ok(match allocation_id {
            Some(id) => Value::Array(filter_by_allocation(&body, id)),
            None => body,
        })
    }

    pub async fn list_allocations(&self) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        self.query(
            client_query(endpoints::SC_REST_ALLOCATIONS, "client", sender.client_id),
            None,
        )
        .await
    }

    /// Minimum lock needed for an allocation with these parameters.
    pub async fn allocation_min_lock(&self, params: &AllocationParams) -> WalletResult<Value> {
        let sender = self.ensure_initialized()?;
        let body = json!({
            "allocation_data": params.descriptor(sender.client_id, sender.public_key, now_unix())?,
        });
        let request =
            QuorumRequest::post(NodeRole::Query, endpoints::SC_REST_ALLOCATION_MIN_LOCK).json(&body);
        Ok(self.engine().send(request).await?.body)
    }

    pub async fn get_vesting_pool_config(&self) -> WalletResult<Value> {
        self.ensure_initialized()?;
        self.query(QuorumRequest::get(NodeRole::Query, endpoints::VP_GET_CONFIG), None)
            .await
    }

    // ------------------------------------------------------------------
    // Smart contract calls
    // ------------------------------------------------------------------

    /// Request tokens from the faucet.
    pub async fn add_tokens(&self) -> WalletResult<SubmittedTransaction> {
        let payload = json!({"name": method::POUR, "input": "pour_tokens"});
        self.execute_smart_contract(endpoints::FAUCET_SMART_CONTRACT_ADDRESS, &payload, TOKEN_UNIT)
            .await
    }

    /// Lock whole tokens in the interest pool for a duration.
    pub async fn lock_tokens(
        &self,
        tokens: i64,
        hours: i64,
        minutes: i64,
    ) -> WalletResult<SubmittedTransaction> {
        if hours < 0 || minutes < 0 {
            return Err(WalletError::InvalidDuration { hours, minutes });
        }
        let value = tokens
            .checked_mul(TOKEN_UNIT)
            .ok_or_else(|| WalletError::InvalidAmount(format!("{} tokens overflows", tokens)))?;

        let payload = json!({
            "name": method::LOCK,
            "input": {"duration": format!("{}h{}m", hours, minutes)},
        });
        self.execute_smart_contract(endpoints::INTEREST_POOL_SMART_CONTRACT_ADDRESS, &payload, value)
            .await
    }

    pub async fn create_read_pool(&self) -> WalletResult<SubmittedTransaction> {
        let payload = json!({"name": method::NEW_READ_POOL, "input": null});
        self.execute_smart_contract(endpoints::STORAGE_SMART_CONTRACT_ADDRESS, &payload, 0)
            .await
    }

    /// Create a storage allocation and wait for it to be committed.
    ///
    /// The allocation id is the hash of the confirmed creating transaction.
    pub async fn create_allocation(&self, params: &AllocationParams) -> WalletResult<AllocationOutcome> {
        let sender = self.ensure_initialized()?;
        let payload = params.creation_payload(sender.client_id, sender.public_key, now_unix())?;

        let submitted = self
            .execute_smart_contract(
                endpoints::STORAGE_SMART_CONTRACT_ADDRESS,
                &payload,
                params.lock_tokens,
            )
            .await?;

        let outcome = self
            .lifecycle
            .confirm(submitted.hash(), self.lifecycle.default_deadline())
            .await;

        Ok(match outcome {
            ConfirmationOutcome::Confirmed { hash, .. } => {
                tracing::info!(allocation_id = %hash, "Allocation created");
                AllocationOutcome::Created { allocation_id: hash }
            }
            ConfirmationOutcome::Unconfirmed { reason } => {
                tracing::warn!(
                    hash = %submitted.hash(),
                    reason = %reason,
                    "Allocation creation unconfirmed"
                );
                AllocationOutcome::Unconfirmed {
                    transaction_hash: submitted.hash().to_string(),
                    message: ALLOCATION_UNCONFIRMED_MESSAGE.to_string(),
                }
            }
        })
    }

    /// Extend an allocation's size and expiration.
    pub async fn update_allocation(
        &self,
        allocation_id: &str,
        tokens: i64,
        extend_expiration_hours: i64,
        size: i64,
    ) -> WalletResult<SubmittedTransaction> {
        let sender = self.ensure_initialized()?;
        let expiration_date = extended_expiration(now_unix(), extend_expiration_hours)?;
        let payload = json!({
            "name": method::UPDATE_ALLOCATION,
            "input": {
                "owner_id": sender.client_id,
                "id": allocation_id,
                "size": size,
                "expiration_date": expiration_date,
            },
        });
        self.execute_smart_contract(endpoints::STORAGE_SMART_CONTRACT_ADDRESS, &payload, tokens)
            .await
    }

    /// Stake tokens in a miner or sharder delegate pool.
    pub async fn miner_lock_token(
        &self,
        value: i64,
        node_id: &str,
        node_type: &str,
    ) -> WalletResult<SubmittedTransaction> {
        let payload = json!({
            "name": method::ADD_TO_DELEGATE_POOL,
            "input": {"id": node_id, "type": node_type},
        });
        self.execute_smart_contract(endpoints::MINER_SMART_CONTRACT_ADDRESS, &payload, value)
            .await
    }

    /// Unstake from a miner or sharder delegate pool.
    pub async fn miner_unlock_token(
        &self,
        pool_id: &str,
        node_id: &str,
        node_type: &str,
    ) -> WalletResult<SubmittedTransaction> {
        let payload = json!({
            "name": method::DELETE_FROM_DELEGATE_POOL,
            "input": {"pool_id": pool_id, "id": node_id, "type": node_type},
        });
        self.execute_smart_contract(endpoints::MINER_SMART_CONTRACT_ADDRESS, &payload, 0)
            .await
    }

    /// Stake tokens on a blobber.
    pub async fn blobber_lock_token(
        &self,
        value: i64,
        blobber_id: &str,
    ) -> WalletResult<SubmittedTransaction> {
        let payload = json!({
            "name": method::STAKE_POOL_LOCK,
            "input": {"blobber_id": blobber_id},
        });
        self.execute_smart_contract(endpoints::STORAGE_SMART_CONTRACT_ADDRESS, &payload, value)
            .await
    }

    /// Unstake a blobber stake pool.
    pub async fn blobber_unlock_token(
        &self,
        pool_id: &str,
        blobber_id: &str,
    ) -> WalletResult<SubmittedTransaction> {
        let payload = json!({
            "name": method::STAKE_POOL_UNLOCK,
            "input": {"pool_id": pool_id, "blobber_id": blobber_id},
        });
        self.execute_smart_contract(endpoints::STORAGE_SMART_CONTRACT_ADDRESS, &payload, 0)
            .await
    }
}
