//! Storage allocation parameters and payloads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::wallet::endpoints::method;
use crate::wallet::{WalletError, WalletResult};

/// Seconds an allocation lives unless updated.
pub const DEFAULT_ALLOCATION_LIFETIME_SECS: i64 = 30 * 24 * 3600;

/// Inclusive price bounds in the smallest token unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0, max: i64::MAX }
    }
}

/// Parameters of a new storage allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationParams {
    pub data_shards: u32,
    pub parity_shards: u32,
    /// Bytes.
    pub size: i64,
    /// Tokens locked into the write pool, smallest unit.
    pub lock_tokens: i64,
    pub preferred_blobbers: Vec<String>,
    pub read_price: PriceRange,
    pub write_price: PriceRange,
    /// Nanoseconds.
    pub max_challenge_completion_time: i64,
    /// Seconds from creation until expiry.
    pub lifetime_secs: i64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            data_shards: 2,
            parity_shards: 2,
            size: 2 * 1024 * 1024 * 1024,
            lock_tokens: 5_000_000_000,
            preferred_blobbers: Vec::new(),
            read_price: PriceRange::default(),
            write_price: PriceRange::default(),
            max_challenge_completion_time: 3600 * 1_000_000_000,
            lifetime_secs: DEFAULT_ALLOCATION_LIFETIME_SECS,
        }
    }
}

impl AllocationParams {
    /// Unix expiry for an allocation created at `now`.
    pub fn expiration_date(&self, now: i64) -> WalletResult<i64> {
        if self.lifetime_secs <= 0 {
            return Err(WalletError::InvalidLifetime(self.lifetime_secs));
        }
        now.checked_add(self.lifetime_secs)
            .ok_or(WalletError::InvalidLifetime(self.lifetime_secs))
    }

    /// The allocation descriptor shared by creation and min-lock queries.
    pub fn descriptor(&self, owner_id: &str, owner_public_key: &str, now: i64) -> WalletResult<Value> {
        Ok(json!({
            "data_shards": self.data_shards,
            "parity_shards": self.parity_shards,
            "owner_id": owner_id,
            "owner_public_key": owner_public_key,
            "size": self.size,
            "expiration_date": self.expiration_date(now)?,
            "read_price_range": self.read_price,
            "write_price_range": self.write_price,
            "max_challenge_completion_time": self.max_challenge_completion_time,
            "preferred_blobbers": self.preferred_blobbers,
        }))
    }

    /// Transaction payload requesting a new allocation.
    pub fn creation_payload(
        &self,
        owner_id: &str,
        owner_public_key: &str,
        now: i64,
    ) -> WalletResult<Value> {
        Ok(json!({
            "name": method::NEW_ALLOCATION,
            "input": self.descriptor(owner_id, owner_public_key, now)?,
        }))
    }
}

/// Result of an allocation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AllocationOutcome {
    /// The creating transaction was observed in a block.
    Created { allocation_id: String },
    /// Submitted but not observed before the deadline; status unknown.
    Unconfirmed {
        transaction_hash: String,
        message: String,
    },
}

impl AllocationOutcome {
    pub fn allocation_id(&self) -> Option<&str> {
        match self {
            AllocationOutcome::Created { allocation_id } => Some(allocation_id),
            AllocationOutcome::Unconfirmed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_payload() {
        let params = AllocationParams {
            preferred_blobbers: vec!["b1".into()],
            ..AllocationParams::default()
        };
        let payload = params.creation_payload("owner", "owner-pk", 1_000).unwrap();

        assert_eq!(payload["name"], "new_allocation_request");
        let input = &payload["input"];
        assert_eq!(input["data_shards"], 2);
        assert_eq!(input["parity_shards"], 2);
        assert_eq!(input["owner_id"], "owner");
        assert_eq!(input["owner_public_key"], "owner-pk");
        assert_eq!(input["size"], 2_147_483_648i64);
        assert_eq!(input["expiration_date"], 1_000 + DEFAULT_ALLOCATION_LIFETIME_SECS);
        assert_eq!(input["read_price_range"], json!({"min": 0, "max": i64::MAX}));
        assert_eq!(input["preferred_blobbers"], json!(["b1"]));
    }

    #[test]
    fn test_lifetime_must_be_positive_and_fit() {
        let negative = AllocationParams {
            lifetime_secs: -60,
            ..AllocationParams::default()
        };
        assert!(matches!(
            negative.descriptor("owner", "pk", 1_000),
            Err(WalletError::InvalidLifetime(-60))
        ));

        let huge = AllocationParams {
            lifetime_secs: i64::MAX,
            ..AllocationParams::default()
        };
        assert!(matches!(
            huge.creation_payload("owner", "pk", 1_000),
            Err(WalletError::InvalidLifetime(i64::MAX))
        ));
    }

    #[test]
    fn test_outcome_serialization() {
        let created = AllocationOutcome::Created {
            allocation_id: "h1".into(),
        };
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({"status": "created", "allocation_id": "h1"})
        );
        assert_eq!(created.allocation_id(), Some("h1"));

        let unconfirmed = AllocationOutcome::Unconfirmed {
            transaction_hash: "h2".into(),
            message: "m".into(),
        };
        assert_eq!(serde_json::to_value(&unconfirmed).unwrap()["status"], "unconfirmed");
        assert_eq!(unconfirmed.allocation_id(), None);
    }
}
