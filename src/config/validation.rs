//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (threshold fraction, timeouts > 0)
//! - Check node URLs parse for their role
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{BridgeConfig, SignerKind};
use crate::network::{parse_base_url, NodeRole};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let threshold = config.quorum.threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        errors.push(ValidationError::new(
            "quorum.threshold",
            format!("must be within (0, 1], got {}", threshold),
        ));
    }
    if config.quorum.node_timeout_ms == 0 {
        errors.push(ValidationError::new("quorum.node_timeout_ms", "must be > 0"));
    }

    let confirmation = &config.confirmation;
    if confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::new("confirmation.poll_interval_ms", "must be > 0"));
    }
    if confirmation.max_poll_interval_ms < confirmation.poll_interval_ms {
        errors.push(ValidationError::new(
            "confirmation.max_poll_interval_ms",
            "must be >= poll_interval_ms",
        ));
    }
    if confirmation.deadline_secs == 0 {
        errors.push(ValidationError::new("confirmation.deadline_secs", "must be > 0"));
    }

    for (role, field, urls) in [
        (NodeRole::Transaction, "network.miners", &config.network.miners),
        (NodeRole::Query, "network.sharders", &config.network.sharders),
    ] {
        for url in urls {
            if let Err(e) = parse_base_url(role, url) {
                errors.push(ValidationError::new(field, e.to_string()));
            }
        }
    }

    if config.signer.kind == SignerKind::Process {
        if config.signer.program.trim().is_empty() {
            errors.push(ValidationError::new(
                "signer.program",
                "required when kind = \"process\"",
            ));
        }
        if config.signer.signature_len == 0 {
            errors.push(ValidationError::new("signer.signature_len", "must be > 0"));
        }
        if config.signer.timeout_ms == 0 {
            errors.push(ValidationError::new("signer.timeout_ms", "must be > 0"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
