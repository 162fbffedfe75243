//! Request, result and error types for quorum rounds.

use reqwest::Method;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::network::NodeRole;
use crate::resilience::Deadline;

/// One logical request fanned out to every node of a role.
#[derive(Debug, Clone)]
pub struct QuorumRequest {
    pub role: NodeRole,
    /// Path plus query, relative to each node's base URL.
    pub endpoint: String,
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Caller-declared safe result when no group reaches quorum.
    pub empty_fallback: Option<Value>,
    /// Accept any single node echoing this transaction hash.
    pub expected_hash: Option<String>,
    /// Bound on the whole round, on top of per-node timeouts.
    pub deadline: Option<Deadline>,
}

impl QuorumRequest {
    pub fn new(role: NodeRole, method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            role,
            endpoint: endpoint.into(),
            method,
            body: None,
            headers: Vec::new(),
            empty_fallback: None,
            expected_hash: None,
            deadline: None,
        }
    }

    pub fn get(role: NodeRole, endpoint: impl Into<String>) -> Self {
        Self::new(role, Method::GET, endpoint)
    }

    pub fn post(role: NodeRole, endpoint: impl Into<String>) -> Self {
        Self::new(role, Method::POST, endpoint)
    }

    /// Attach a JSON body and the matching content type.
    pub fn json(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self.header("Content-Type", "application/json")
    }

    /// Attach an already-serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a URL-encoded query parameter to the endpoint.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        let pair = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        self.endpoint.push(separator);
        self.endpoint.push_str(&pair);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn empty_fallback(mut self, fallback: Value) -> Self {
        self.empty_fallback = Some(fallback);
        self
    }

    pub fn expect_hash(mut self, hash: impl Into<String>) -> Self {
        self.expected_hash = Some(hash.into());
        self
    }

    pub fn deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// How a single node answered.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutcome {
    /// 2xx with a JSON body.
    Success(Value),
    /// Non-2xx status.
    HttpError(u16),
    /// 2xx with an empty or non-JSON body.
    InvalidBody(String),
    /// No answer within the per-node timeout.
    Timeout,
    /// Connection or transport failure.
    NetworkError(String),
    /// Still outstanding when the round ended.
    Cancelled,
}

impl NodeOutcome {
    /// Stable label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            NodeOutcome::Success(_) => "success",
            NodeOutcome::HttpError(_) => "http_error",
            NodeOutcome::InvalidBody(_) => "invalid_body",
            NodeOutcome::Timeout => "timeout",
            NodeOutcome::NetworkError(_) => "network_error",
            NodeOutcome::Cancelled => "cancelled",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NodeOutcome::Success(_))
    }
}

/// Per-node diagnostic entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReport {
    /// Node base URL.
    pub node: String,
    pub outcome: NodeOutcome,
}

impl fmt::Display for NodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            NodeOutcome::Success(_) => write!(f, "{}: success", self.node),
            NodeOutcome::HttpError(status) => write!(f, "{}: HTTP {}", self.node, status),
            NodeOutcome::InvalidBody(reason) => write!(f, "{}: invalid body ({})", self.node, reason),
            NodeOutcome::Timeout => write!(f, "{}: timeout", self.node),
            NodeOutcome::NetworkError(reason) => write!(f, "{}: network error ({})", self.node, reason),
            NodeOutcome::Cancelled => write!(f, "{}: cancelled", self.node),
        }
    }
}

/// Reduced outcome of one fan-out round.
#[derive(Debug, Clone)]
pub struct QuorumResult {
    /// The trusted body (or the caller's fallback).
    pub body: Value,
    /// Nodes whose body equals `body`; zero for a fallback.
    pub agree_count: usize,
    /// Nodes that returned a parsable 2xx body.
    pub responses: usize,
    /// Nodes configured for the role.
    pub total_nodes: usize,
    pub reports: Vec<NodeReport>,
}

impl QuorumResult {
    /// True when the body is the caller's empty fallback.
    pub fn is_fallback(&self) -> bool {
        self.agree_count == 0
    }
}

/// Errors that fail a whole round.
#[derive(Debug, Error)]
pub enum QuorumError {
    #[error("no {0} configured")]
    NoNodesConfigured(NodeRole),

    #[error(
        "quorum not reached on {role}: best agreement {best}, required {required} ({})",
        summarize(.reports)
    )]
    QuorumNotReached {
        role: NodeRole,
        required: usize,
        best: usize,
        reports: Vec<NodeReport>,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Compact `label=count` summary of a round, in first-seen order.
pub fn summarize(reports: &[NodeReport]) -> String {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for report in reports {
        let label = report.outcome.label();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
        .iter()
        .map(|(label, n)| format!("{}={}", label, n))
        .collect::<Vec<_>>()
        .join(", ")
}
