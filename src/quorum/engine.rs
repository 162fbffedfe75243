//! Fan-out request engine.
//!
//! # Responsibilities
//! - Send one request to every node of a role concurrently
//! - Bound each node by its own timeout and the round by an optional deadline
//! - Classify every answer and reduce the bodies to one trusted result
//!
//! # Design Decisions
//! - Per-node failures never abort a round; they are non-agreeing votes
//! - The round ends as soon as the outcome cannot change; outstanding node
//!   futures are dropped, which releases their connections
//! - The engine holds no mutable state between calls

use futures_util::stream::{FuturesUnordered, StreamExt};
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

use crate::config::QuorumConfig;
use crate::network::{Network, NodeRole};
use crate::observability::metrics;
use crate::quorum::reduce::{required_agreement, response_hash, Tally, Verdict};
use crate::quorum::types::{NodeOutcome, NodeReport, QuorumError, QuorumRequest, QuorumResult};

/// Header carrying the round identifier to every node.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Quorum request engine over an immutable node table.
#[derive(Clone)]
pub struct QuorumEngine {
    client: Client,
    network: Arc<Network>,
    threshold: f64,
    node_timeout: Duration,
}

impl QuorumEngine {
    /// Create an engine with its own HTTP client.
    pub fn new(network: Arc<Network>, config: &QuorumConfig) -> Result<Self, QuorumError> {
        let client = Client::builder()
            .user_agent(concat!("wallet-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuorumError::Client(e.to_string()))?;

        Ok(Self::with_client(client, network, config))
    }

    /// Create an engine sharing an existing HTTP client.
    pub fn with_client(client: Client, network: Arc<Network>, config: &QuorumConfig) -> Self {
        Self {
            client,
            network,
            threshold: config.threshold,
            node_timeout: Duration::from_millis(config.node_timeout_ms),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Agreeing nodes needed for a role with the current table.
    pub fn required_agreement(&self, role: NodeRole) -> usize {
        required_agreement(self.threshold, self.network.nodes(role).len())
    }

    /// Run one fan-out round and reduce it.
    pub async fn send(&self, request: QuorumRequest) -> Result<QuorumResult, QuorumError> {
        let role = request.role;
        let nodes = self.network.nodes(role);
        if nodes.is_empty() {
            return Err(QuorumError::NoNodesConfigured(role));
        }

        let endpoint = request.endpoint.trim_start_matches('/');
        let targets: Vec<Url> = nodes
            .iter()
            .map(|base| base.join(endpoint))
            .collect::<Result<_, _>>()
            .map_err(|e| {
                QuorumError::InvalidRequest(format!("endpoint '{}': {}", request.endpoint, e))
            })?;

        let total = nodes.len();
        let required = required_agreement(self.threshold, total);
        let round_id = Uuid::new_v4();
        let started = Instant::now();

        tracing::debug!(
            round = %round_id,
            role = %role,
            method = %request.method,
            endpoint = %request.endpoint,
            nodes = total,
            required,
            "Starting quorum round"
        );

        let mut pending: FuturesUnordered<_> = targets
            .into_iter()
            .enumerate()
            .map(|(idx, url)| {
                let client = self.client.clone();
                let method = request.method.clone();
                let body = request.body.clone();
                let headers = request.headers.clone();
                let timeout = self.node_timeout;
                async move {
                    let outcome =
                        Self::call_node(client, method, url, body, headers, round_id, timeout).await;
                    (idx, outcome)
                }
            })
            .collect();

        let mut outcomes: Vec<Option<NodeOutcome>> = vec![None; total];
        let mut tally = Tally::default();
        let mut accepted: Option<usize> = None;

        loop {
            let next = match request.deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline.instant(), pending.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            tracing::warn!(
                                round = %round_id,
                                role = %role,
                                outstanding = pending.len(),
                                "Round deadline reached, abandoning outstanding nodes"
                            );
                            break;
                        }
                    }
                }
                None => pending.next().await,
            };

            let Some((idx, outcome)) = next else { break };

            metrics::record_node_response(role, outcome.label());
            tracing::debug!(
                round = %round_id,
                node = %nodes[idx],
                class = outcome.label(),
                "Node answered"
            );

            if let NodeOutcome::Success(body) = &outcome {
                let group = tally.add(body);
                if let Some(expected) = request.expected_hash.as_deref() {
                    if response_hash(body) == Some(expected) {
                        accepted = Some(group);
                    }
                }
            }
            outcomes[idx] = Some(outcome);

            if accepted.is_some() {
                break;
            }
            // Hash rounds ignore body agreement: any later node may still echo.
            if request.expected_hash.is_none() {
                match tally.verdict(required, pending.len()) {
                    Verdict::Agreed(_) | Verdict::Unreachable => break,
                    Verdict::Pending => {}
                }
            }
        }
        drop(pending);

        let reports: Vec<NodeReport> = nodes
            .iter()
            .zip(outcomes)
            .map(|(node, outcome)| NodeReport {
                node: node.to_string(),
                outcome: outcome.unwrap_or(NodeOutcome::Cancelled),
            })
            .collect();
        let responses = reports.iter().filter(|r| r.outcome.is_success()).count();
        let elapsed = started.elapsed();

        let winner = match request.expected_hash {
            Some(_) => accepted,
            None => tally.settle(required),
        };

        if let Some(group) = winner {
            let agree_count = tally.count(group);
            let body = tally.body(group).cloned().unwrap_or_default();
            let outcome = if accepted.is_some() { "hash_accepted" } else { "agreed" };

            tracing::info!(
                round = %round_id,
                role = %role,
                agree = agree_count,
                responses,
                total,
                outcome,
                elapsed_ms = elapsed.as_millis() as u64,
                "Quorum round complete"
            );
            metrics::record_quorum_round(role, outcome, elapsed);

            return Ok(QuorumResult {
                body,
                agree_count,
                responses,
                total_nodes: total,
                reports,
            });
        }

        // In a hash round nothing counts as agreement unless it echoed the hash.
        let best = match request.expected_hash {
            Some(_) => 0,
            None => tally.leader().map(|(_, n)| n).unwrap_or(0),
        };

        if let Some(fallback) = request.empty_fallback {
            tracing::info!(
                round = %round_id,
                role = %role,
                best,
                required,
                responses,
                "No quorum, using caller fallback"
            );
            metrics::record_quorum_round(role, "fallback", elapsed);

            return Ok(QuorumResult {
                body: fallback,
                agree_count: 0,
                responses,
                total_nodes: total,
                reports,
            });
        }

        tracing::warn!(
            round = %round_id,
            role = %role,
            best,
            required,
            responses,
            "Quorum not reached"
        );
        metrics::record_quorum_round(role, "failed", elapsed);

        Err(QuorumError::QuorumNotReached {
            role,
            required,
            best,
            reports,
        })
    }

    async fn call_node(
        client: Client,
        method: Method,
        url: Url,
        body: Option<String>,
        headers: Vec<(String, String)>,
        round_id: Uuid,
        timeout: Duration,
    ) -> NodeOutcome {
        let mut builder = client
            .request(method, url)
            .timeout(timeout)
            .header(REQUEST_ID_HEADER, round_id.to_string());
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Err(_) => NodeOutcome::Timeout,
            Ok(Err(e)) if e.is_timeout() => NodeOutcome::Timeout,
            Ok(Err(e)) => NodeOutcome::NetworkError(e.to_string()),
            Ok(Ok((status, _))) if !status.is_success() => NodeOutcome::HttpError(status.as_u16()),
            Ok(Ok((_, bytes))) => classify_body(&bytes),
        }
    }
}

/// Classify a 2xx body; empty and non-JSON bodies are parse failures.
fn classify_body(bytes: &[u8]) -> NodeOutcome {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return NodeOutcome::InvalidBody("empty body".to_string());
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => NodeOutcome::Success(value),
        Err(e) => NodeOutcome::InvalidBody(format!("invalid JSON: {}", e)),
    }
}

impl std::fmt::Debug for QuorumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuorumEngine")
            .field("miners", &self.network.nodes(NodeRole::Transaction).len())
            .field("sharders", &self.network.nodes(NodeRole::Query).len())
            .field("threshold", &self.threshold)
            .field("node_timeout", &self.node_timeout)
            .finish()
    }
}
