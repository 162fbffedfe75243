//! Shared utilities for integration tests: programmable mock nodes.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use wallet_bridge::config::{ConfirmationConfig, QuorumConfig};
use wallet_bridge::signer::LocalKeySigner;
use wallet_bridge::wallet::{KeyPair, WalletKeys};
use wallet_bridge::{Network, QuorumEngine, TransactionLifecycle, Wallet};

/// Well-known development key (first Anvil account).
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_CLIENT_ID: &str = "client-0001";
pub const TEST_PUBLIC_KEY: &str = "public-0001";

/// What a mock node saw.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl MockRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

type Responder =
    Arc<dyn Fn(MockRequest) -> Pin<Box<dyn Future<Output = (u16, String)> + Send>> + Send + Sync>;

#[derive(Clone)]
struct NodeState {
    responder: Responder,
    hits: Arc<AtomicUsize>,
}

/// A running mock node.
#[derive(Clone)]
pub struct MockNode {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockNode {
    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn handle(
    State(state): State<NodeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let request = MockRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    let (status, body) = (state.responder)(request).await;
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a programmable mock node on an ephemeral port.
pub async fn start_programmable_node<F, Fut>(f: F) -> MockNode
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let f = Arc::new(f);
    let responder: Responder = Arc::new(move |request| {
        let f = f.clone();
        Box::pin(async move { f(request).await })
    });
    let state = NodeState {
        responder,
        hits: hits.clone(),
    };

    let app = Router::new().fallback(handle).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockNode {
        url: format!("http://{}/", addr),
        hits,
    }
}

/// Node that always answers 200 with `body`.
pub async fn json_node(body: Value) -> MockNode {
    let body = body.to_string();
    start_programmable_node(move |_| {
        let body = body.clone();
        async move { (200, body) }
    })
    .await
}

/// Node that always answers with `status` and an error body.
pub async fn status_node(status: u16) -> MockNode {
    start_programmable_node(move |_| async move { (status, r#"{"error":"failed"}"#.to_string()) })
        .await
}

/// Node that answers 200 with a body that is not JSON.
pub async fn garbage_node() -> MockNode {
    start_programmable_node(|_| async { (200, "<html>oops</html>".to_string()) }).await
}

/// Node that waits `delay` before answering with `body`.
pub async fn slow_node(delay: Duration, body: Value) -> MockNode {
    let body = body.to_string();
    start_programmable_node(move |_| {
        let body = body.clone();
        async move {
            tokio::time::sleep(delay).await;
            (200, body)
        }
    })
    .await
}

/// Miner that accepts any transaction and echoes its hash.
pub async fn accepting_miner() -> MockNode {
    slow_accepting_miner(Duration::ZERO).await
}

/// Miner that echoes the transaction hash after `delay`.
pub async fn slow_accepting_miner(delay: Duration) -> MockNode {
    start_programmable_node(move |request| async move {
        tokio::time::sleep(delay).await;
        let tx = request.json();
        let hash = tx.get("hash").cloned().unwrap_or(Value::Null);
        (200, json!({"entity": {"hash": hash}, "async": true}).to_string())
    })
    .await
}

/// Base URL of a loopback port nothing listens on; connections are refused.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Sharder that reports `hash` as confirmed once asked `after` times.
pub async fn confirming_sharder(after: usize) -> MockNode {
    let polls = Arc::new(AtomicUsize::new(0));
    start_programmable_node(move |request| {
        let polls = polls.clone();
        async move {
            let n = polls.fetch_add(1, Ordering::SeqCst) + 1;
            let hash = request
                .query
                .as_deref()
                .and_then(|q| q.strip_prefix("hash="))
                .unwrap_or_default()
                .to_string();
            if n >= after {
                (
                    200,
                    json!({"hash": hash, "block_hash": "block-1", "round": 42}).to_string(),
                )
            } else {
                (400, r#"{"error":"entity not present"}"#.to_string())
            }
        }
    })
    .await
}

pub fn urls(nodes: &[MockNode]) -> Vec<String> {
    nodes.iter().map(|n| n.url.clone()).collect()
}

pub fn network(miners: &[MockNode], sharders: &[MockNode]) -> Arc<Network> {
    Arc::new(Network::new(urls(miners), urls(sharders)).unwrap())
}

pub fn quorum_config(node_timeout_ms: u64) -> QuorumConfig {
    QuorumConfig {
        threshold: 0.51,
        node_timeout_ms,
    }
}

/// Short intervals so polling tests finish quickly.
pub fn fast_confirmation(deadline_secs: u64) -> ConfirmationConfig {
    ConfirmationConfig {
        poll_interval_ms: 50,
        max_poll_interval_ms: 100,
        deadline_secs,
    }
}

pub fn engine(miners: &[MockNode], sharders: &[MockNode]) -> QuorumEngine {
    QuorumEngine::new(network(miners, sharders), &quorum_config(2_000)).unwrap()
}

pub fn lifecycle(
    miners: &[MockNode],
    sharders: &[MockNode],
    deadline_secs: u64,
) -> TransactionLifecycle {
    TransactionLifecycle::new(
        engine(miners, sharders),
        Arc::new(LocalKeySigner::new()),
        fast_confirmation(deadline_secs),
    )
}

/// Lifecycle over raw base URLs, for nodes that are not mocks.
pub fn lifecycle_with_urls(miners: Vec<String>, sharders: Vec<String>) -> TransactionLifecycle {
    let network = Arc::new(Network::new(miners, sharders).unwrap());
    TransactionLifecycle::new(
        QuorumEngine::new(network, &quorum_config(2_000)).unwrap(),
        Arc::new(LocalKeySigner::new()),
        fast_confirmation(5),
    )
}

pub fn test_keys() -> WalletKeys {
    WalletKeys {
        client_id: Some(TEST_CLIENT_ID.into()),
        client_key: Some(TEST_PUBLIC_KEY.into()),
        keys: vec![KeyPair {
            public_key: TEST_PUBLIC_KEY.into(),
            private_key: TEST_PRIVATE_KEY.into(),
        }],
        ..WalletKeys::default()
    }
}

pub fn wallet(miners: &[MockNode], sharders: &[MockNode], deadline_secs: u64) -> Wallet {
    Wallet::new(test_keys(), lifecycle(miners, sharders, deadline_secs))
}
