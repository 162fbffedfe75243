//! Wallet operations end to end against mock nodes.

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use wallet_bridge::wallet::endpoints;
use wallet_bridge::wallet::{AllocationOutcome, AllocationParams, WalletKeys, TOKEN_UNIT};
use wallet_bridge::{Wallet, WalletError};

mod common;

/// Miner that records every transaction it accepts.
async fn recording_miner(log: Arc<Mutex<Vec<Value>>>) -> common::MockNode {
    common::start_programmable_node(move |request| {
        let log = log.clone();
        async move {
            let tx = request.json();
            let hash = tx["hash"].clone();
            log.lock().unwrap().push(tx);
            (200, json!({"entity": {"hash": hash}}).to_string())
        }
    })
    .await
}

fn payload(tx: &Value) -> Value {
    serde_json::from_str(tx["transaction_data"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_balance_from_agreeing_sharders() {
    let sharders = vec![
        common::start_programmable_node(|request| async move {
            assert_eq!(request.path, endpoints::GET_BALANCE);
            assert_eq!(request.query.as_deref(), Some("client_id=client-0001"));
            (200, json!({"balance": 12_500_000_000i64, "round": 3}).to_string())
        })
        .await,
        common::json_node(json!({"balance": 12_500_000_000i64, "round": 3})).await,
        common::status_node(500).await,
    ];
    let wallet = common::wallet(&[], &sharders, 5);

    assert_eq!(wallet.get_balance().await.unwrap(), 12_500_000_000);
}

#[tokio::test]
async fn test_client_id_is_encoded_in_queries() {
    let sharder = common::start_programmable_node(|request| async move {
        assert_eq!(request.path, endpoints::GET_BALANCE);
        assert_eq!(request.query.as_deref(), Some("client_id=odd+id%26round%3D1"));
        (200, json!({"balance": 7}).to_string())
    })
    .await;
    let keys = WalletKeys {
        client_id: Some("odd id&round=1".into()),
        ..common::test_keys()
    };
    let wallet = Wallet::new(keys, common::lifecycle(&[], &[sharder], 5));

    assert_eq!(wallet.get_balance().await.unwrap(), 7);
}

#[tokio::test]
async fn test_unknown_client_balance_is_zero() {
    let sharders = vec![common::status_node(400).await, common::status_node(400).await];
    let wallet = common::wallet(&[], &sharders, 5);

    assert_eq!(wallet.get_balance().await.unwrap(), 0);
}

#[tokio::test]
async fn test_locked_tokens_fallback() {
    let sharders = vec![common::status_node(400).await];
    let wallet = common::wallet(&[], &sharders, 5);

    let locked = wallet.get_locked_tokens().await.unwrap();
    assert_eq!(locked["code"], "resource_not_found");
}

#[tokio::test]
async fn test_user_pools_fallback() {
    let sharders = vec![common::garbage_node().await];
    let wallet = common::wallet(&[], &sharders, 5);

    assert_eq!(wallet.get_user_pools().await.unwrap(), json!({"pools": {}}));
}

#[tokio::test]
async fn test_lock_config_without_agreement_errors() {
    let sharders = vec![
        common::json_node(json!({"min_lock": 10})).await,
        common::json_node(json!({"min_lock": 20})).await,
    ];
    let wallet = common::wallet(&[], &sharders, 5);

    assert!(matches!(
        wallet.get_lock_config().await,
        Err(WalletError::Quorum(_))
    ));
}

#[tokio::test]
async fn test_read_pool_filtered_by_allocation() {
    let pools = json!({"pools": [
        {"id": "p1", "allocation_id": "alloc-1", "balance": 10},
        {"id": "p2", "allocation_id": "alloc-2", "balance": 20},
    ]});
    let sharders = vec![common::json_node(pools.clone()).await];
    let wallet = common::wallet(&[], &sharders, 5);

    let filtered = wallet.get_read_pool_info(Some("alloc-2")).await.unwrap();
    assert_eq!(filtered, json!([{"id": "p2", "allocation_id": "alloc-2", "balance": 20}]));
    assert_eq!(wallet.get_write_pool_info(None).await.unwrap(), pools);
}

#[tokio::test]
async fn test_allocation_min_lock_posts_descriptor() {
    let sharder = common::start_programmable_node(|request| async move {
        let body = request.json();
        assert_eq!(request.method, axum::http::Method::POST);
        assert_eq!(body["allocation_data"]["owner_id"], "client-0001");
        assert_eq!(body["allocation_data"]["data_shards"], 2);
        (200, json!({"min_lock_demand": 123}).to_string())
    })
    .await;
    let wallet = common::wallet(&[], &[sharder], 5);

    let result = wallet
        .allocation_min_lock(&AllocationParams::default())
        .await
        .unwrap();
    assert_eq!(result["min_lock_demand"], 123);
}

#[tokio::test]
async fn test_faucet_pour() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let miners = vec![recording_miner(log.clone()).await];
    let wallet = common::wallet(&miners, &[], 5);

    let submitted = wallet.add_tokens().await.unwrap();

    let txs = log.lock().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["hash"], submitted.hash());
    assert_eq!(txs[0]["to_client_id"], endpoints::FAUCET_SMART_CONTRACT_ADDRESS);
    assert_eq!(txs[0]["transaction_value"], TOKEN_UNIT);
    assert_eq!(payload(&txs[0]), json!({"name": "pour", "input": "pour_tokens"}));
}

#[tokio::test]
async fn test_lock_tokens_payload() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let miners = vec![recording_miner(log.clone()).await];
    let wallet = common::wallet(&miners, &[], 5);

    wallet.lock_tokens(2, 1, 30).await.unwrap();

    let txs = log.lock().unwrap();
    assert_eq!(txs[0]["to_client_id"], endpoints::INTEREST_POOL_SMART_CONTRACT_ADDRESS);
    assert_eq!(txs[0]["transaction_value"], 2 * TOKEN_UNIT);
    assert_eq!(
        payload(&txs[0]),
        json!({"name": "lock", "input": {"duration": "1h30m"}})
    );
}

#[tokio::test]
async fn test_staking_payloads() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let miners = vec![recording_miner(log.clone()).await];
    let wallet = common::wallet(&miners, &[], 5);

    wallet.miner_lock_token(7, "node-1", "miner").await.unwrap();
    wallet.blobber_unlock_token("pool-9", "blobber-3").await.unwrap();

    let txs = log.lock().unwrap();
    assert_eq!(txs[0]["to_client_id"], endpoints::MINER_SMART_CONTRACT_ADDRESS);
    assert_eq!(
        payload(&txs[0]),
        json!({"name": "addToDelegatePool", "input": {"id": "node-1", "type": "miner"}})
    );
    assert_eq!(txs[1]["to_client_id"], endpoints::STORAGE_SMART_CONTRACT_ADDRESS);
    assert_eq!(txs[1]["transaction_value"], 0);
    assert_eq!(
        payload(&txs[1]),
        json!({"name": "stake_pool_unlock", "input": {"pool_id": "pool-9", "blobber_id": "blobber-3"}})
    );
}

#[tokio::test]
async fn test_create_allocation_confirmed() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let miners = vec![recording_miner(log.clone()).await];
    let sharders = vec![common::confirming_sharder(2).await];
    let wallet = common::wallet(&miners, &sharders, 5);

    let outcome = wallet
        .create_allocation(&AllocationParams::default())
        .await
        .unwrap();

    let txs = log.lock().unwrap();
    let hash = txs[0]["hash"].as_str().unwrap();
    assert_eq!(
        outcome,
        AllocationOutcome::Created {
            allocation_id: hash.to_string()
        }
    );
    let request = payload(&txs[0]);
    assert_eq!(request["name"], "new_allocation_request");
    assert_eq!(request["input"]["owner_id"], common::TEST_CLIENT_ID);
    assert_eq!(txs[0]["transaction_value"], 5_000_000_000i64);
}

#[tokio::test]
async fn test_create_allocation_unconfirmed() {
    let miners = vec![common::accepting_miner().await];
    let sharders = vec![common::status_node(400).await];
    let wallet = common::wallet(&miners, &sharders, 1);

    let outcome = wallet
        .create_allocation(&AllocationParams::default())
        .await
        .unwrap();

    match outcome {
        AllocationOutcome::Unconfirmed {
            transaction_hash,
            message,
        } => {
            assert_eq!(transaction_hash.len(), 64);
            assert_eq!(message, "Allocation creation could not be confirmed");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_uninitialized_wallet_contacts_no_node() {
    let miner = common::accepting_miner().await;
    let sharder = common::json_node(json!({"balance": 1})).await;
    let engine = common::lifecycle(
        std::slice::from_ref(&miner),
        std::slice::from_ref(&sharder),
        5,
    );
    let wallet = Wallet::new(WalletKeys::default(), engine);

    assert!(matches!(wallet.get_balance().await, Err(WalletError::NotInitialized)));
    assert!(matches!(wallet.add_tokens().await, Err(WalletError::NotInitialized)));
    assert_eq!(miner.hits(), 0);
    assert_eq!(sharder.hits(), 0);
}
