//! Tests for the in-process code store

use std::sync::Arc;
use std::time::Duration;

use re_core::errors::CodeError;
use re_core::repositories::CodeStore;
use re_shared::config::VerificationConfig;

use crate::cache::LocalCodeCache;

const BUSINESS: &str = "login";
const PHONE: &str = "13800001234";

fn store() -> LocalCodeCache {
    LocalCodeCache::new(VerificationConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_issue_within_cooldown_keeps_code() {
    let store = store();
    store.issue_code(BUSINESS, PHONE, "111111").await.unwrap();

    tokio::time::advance(Duration::from_secs(59)).await;
    let result = store.issue_code(BUSINESS, PHONE, "222222").await;
    assert_eq!(result, Err(CodeError::SendTooFrequent));

    // The first code is still the live one
    assert_eq!(store.verify_code(BUSINESS, PHONE, "111111").await, Ok(true));
}

#[tokio::test(start_paused = true)]
async fn test_issue_after_cooldown_replaces_code() {
    let store = store();
    store.issue_code(BUSINESS, PHONE, "111111").await.unwrap();

    tokio::time::advance(Duration::from_secs(60)).await;
    store.issue_code(BUSINESS, PHONE, "222222").await.unwrap();

    assert_eq!(store.verify_code(BUSINESS, PHONE, "111111").await, Ok(false));
    assert_eq!(store.verify_code(BUSINESS, PHONE, "222222").await, Ok(true));
}

#[tokio::test]
async fn test_verify_spends_code() {
    let store = store();
    store.issue_code(BUSINESS, PHONE, "123456").await.unwrap();

    assert_eq!(store.verify_code(BUSINESS, PHONE, "123456").await, Ok(true));
    assert_eq!(
        store.verify_code(BUSINESS, PHONE, "123456").await,
        Err(CodeError::VerifyTooMany)
    );
}

#[tokio::test]
async fn test_three_mismatches_lock_code() {
    let store = store();
    store.issue_code(BUSINESS, PHONE, "123456").await.unwrap();

    for _ in 0..3 {
        assert_eq!(store.verify_code(BUSINESS, PHONE, "000000").await, Ok(false));
    }
    assert_eq!(
        store.verify_code(BUSINESS, PHONE, "123456").await,
        Err(CodeError::VerifyTooMany)
    );
}

#[tokio::test(start_paused = true)]
async fn test_expired_code_is_system_error() {
    let store = store();
    store.issue_code(BUSINESS, PHONE, "123456").await.unwrap();

    tokio::time::advance(Duration::from_secs(601)).await;
    let result = store.verify_code(BUSINESS, PHONE, "123456").await;
    assert!(matches!(result, Err(CodeError::System { .. })));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_missing_code_is_system_error() {
    let store = store();
    let result = store.verify_code(BUSINESS, PHONE, "123456").await;
    assert!(matches!(result, Err(CodeError::System { .. })));
}

#[tokio::test]
async fn test_businesses_are_isolated() {
    let store = store();
    store.issue_code("login", PHONE, "111111").await.unwrap();
    store.issue_code("register", PHONE, "222222").await.unwrap();

    assert_eq!(store.verify_code("login", PHONE, "222222").await, Ok(false));
    assert_eq!(store.verify_code("register", PHONE, "222222").await, Ok(true));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_admits_one() {
    let store = Arc::new(store());
    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.issue_code(BUSINESS, PHONE, &format!("{:06}", i)).await
        }));
    }

    let mut issued = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            issued += 1;
        }
    }
    assert_eq!(issued, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_correct_verifies_succeed_once() {
    let store = Arc::new(store());
    store.issue_code(BUSINESS, PHONE, "123456").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.verify_code(BUSINESS, PHONE, "123456").await
        }));
    }

    let mut matched = 0;
    for handle in handles {
        if let Ok(true) = handle.await.unwrap() {
            matched += 1;
        }
    }
    assert_eq!(matched, 1);
}
