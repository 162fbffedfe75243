//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → passed explicitly to Network / QuorumEngine / TransactionLifecycle
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no module-level default state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BridgeConfig, ConfirmationConfig, NetworkConfig, ObservabilityConfig, QuorumConfig,
    SignerConfig, SignerKind,
};
pub use validation::{validate_config, ValidationError};
