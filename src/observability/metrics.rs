//! Metrics collection.
//!
//! # Metrics
//! - `bridge_quorum_rounds_total` (counter): fan-out rounds by role, outcome
//! - `bridge_quorum_round_duration_seconds` (histogram): round latency by role
//! - `bridge_node_responses_total` (counter): per-node classification by role
//! - `bridge_transactions_submitted_total` (counter): accepted submissions
//! - `bridge_confirmations_total` (counter): confirmation outcomes

use std::time::Duration;

use crate::network::NodeRole;

pub fn record_quorum_round(role: NodeRole, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "bridge_quorum_rounds_total",
        "role" => role.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "bridge_quorum_round_duration_seconds",
        "role" => role.as_str()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_node_response(role: NodeRole, classification: &'static str) {
    metrics::counter!(
        "bridge_node_responses_total",
        "role" => role.as_str(),
        "class" => classification
    )
    .increment(1);
}

pub fn record_submission() {
    metrics::counter!("bridge_transactions_submitted_total").increment(1);
}

pub fn record_confirmation(outcome: &'static str) {
    metrics::counter!("bridge_confirmations_total", "outcome" => outcome).increment(1);
}
