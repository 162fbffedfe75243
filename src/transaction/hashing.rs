//! Content hashing for payloads and transactions.

use sha3::{Digest, Sha3_256};

/// SHA3-256 of a UTF-8 string, lowercase hex.
pub fn hash_string(payload: &str) -> String {
    hex::encode(Sha3_256::digest(payload.as_bytes()))
}

/// The exact string a transaction hash is computed over.
///
/// `value` stays an integer in the smallest unit; nodes recompute this string
/// to verify the signature, so it must never be re-formatted.
pub fn canonical_string(
    creation_date: i64,
    client_id: &str,
    to_client_id: &str,
    value: i64,
    payload_hash: &str,
) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        creation_date, client_id, to_client_id, value, payload_hash
    )
}

/// Hash binding timestamp, parties, value and payload hash.
pub fn transaction_hash(
    creation_date: i64,
    client_id: &str,
    to_client_id: &str,
    value: i64,
    payload_hash: &str,
) -> String {
    hash_string(&canonical_string(
        creation_date,
        client_id,
        to_client_id,
        value,
        payload_hash,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            hash_string(""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            hash_string("abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_hash_is_stable() {
        let payload = r#"{"name":"pour","input":"pour_tokens"}"#;
        assert_eq!(hash_string(payload), hash_string(payload));
        assert_eq!(hash_string(payload).len(), 64);
    }

    #[test]
    fn test_canonical_string_layout() {
        assert_eq!(
            canonical_string(1700000000, "alice", "faucet-sc", 5_000_000_000, "ph"),
            "1700000000:alice:faucet-sc:5000000000:ph"
        );
    }

    #[test]
    fn test_transaction_hash_is_sensitive_to_every_field() {
        let base = transaction_hash(100, "alice", "bob", 7, "ph");
        let variants = [
            transaction_hash(101, "alice", "bob", 7, "ph"),
            transaction_hash(100, "alicf", "bob", 7, "ph"),
            transaction_hash(100, "alice", "boc", 7, "ph"),
            transaction_hash(100, "alice", "bob", 8, "ph"),
            transaction_hash(100, "alice", "bob", 7, "pi"),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }
}
