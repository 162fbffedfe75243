//! Transaction lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! payload + parties + value
//!     → hashing.rs (payload hash, canonical transaction hash)
//!     → signer (signature over the transaction hash)
//!     → lifecycle.rs submit (quorum POST to miners, hash-echo acceptance)
//!     → lifecycle.rs confirm (quorum GET to sharders until block hash or deadline)
//! ```
//!
//! # Invariants
//! - `creation_date` is captured once; it is part of the signed hash
//! - Nothing is submitted unsigned or with a malformed signature
//! - A confirmation timeout is an outcome, never an error

pub mod hashing;
pub mod lifecycle;
pub mod types;

pub use hashing::{hash_string, transaction_hash};
pub use lifecycle::TransactionLifecycle;
pub use types::{
    ConfirmationOutcome, Sender, SubmittedTransaction, Transaction, TransactionError,
    TransactionResult, TransactionType,
};
