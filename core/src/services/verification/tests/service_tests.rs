//! Unit tests for the verification service

use std::sync::Arc;
use std::time::Duration;

use re_shared::config::VerificationConfig;

use crate::domain::entities::code_record::CODE_LENGTH;
use crate::errors::{CodeError, DomainError, SmsError};
use crate::services::sms::MessageGateway;
use crate::services::verification::{generate_code, CodeService};

use super::mocks::{MockCodeStore, RecordingGateway};

const BUSINESS: &str = "login";
const PHONE: &str = "13800001234";

fn service(
    store: Arc<MockCodeStore>,
    gateway: Arc<RecordingGateway>,
) -> CodeService<MockCodeStore, RecordingGateway> {
    CodeService::new(store, gateway, VerificationConfig::default())
}

#[test]
fn test_generate_code_format() {
    for _ in 0..1_000 {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

#[tokio::test]
async fn test_send_stores_and_delivers_code() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store.clone(), gateway.clone());

    service.send(BUSINESS, PHONE).await.unwrap();

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template_id, "verification_code");
    assert_eq!(sent[0].recipients, vec![PHONE.to_string()]);
    assert_eq!(sent[0].args[1], "10");

    let stored = store.stored_code(BUSINESS, PHONE).unwrap();
    assert_eq!(sent[0].args[0], stored);
}

#[tokio::test]
async fn test_send_within_cooldown_is_rejected() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store.clone(), gateway.clone());

    service.send(BUSINESS, PHONE).await.unwrap();
    let first = store.stored_code(BUSINESS, PHONE);

    let result = service.send(BUSINESS, PHONE).await;
    assert!(matches!(result, Err(DomainError::Code(CodeError::SendTooFrequent))));

    // Rejected issue never reaches the gateway and keeps the stored code
    assert_eq!(gateway.sent().len(), 1);
    assert_eq!(store.stored_code(BUSINESS, PHONE), first);
}

#[tokio::test(start_paused = true)]
async fn test_send_after_cooldown_replaces_code() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store.clone(), gateway.clone());

    service.send(BUSINESS, PHONE).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    service.send(BUSINESS, PHONE).await.unwrap();

    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(store.stored_code(BUSINESS, PHONE).unwrap(), sent[1].args[0]);
}

#[tokio::test]
async fn test_send_propagates_store_failure() {
    let store = Arc::new(MockCodeStore::new(true));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store, gateway.clone());

    let result = service.send(BUSINESS, PHONE).await;
    assert!(matches!(result, Err(DomainError::Code(CodeError::System { .. }))));
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn test_send_propagates_gateway_failure() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::failing(SmsError::Throttled {
        resource: "sms_gateway_limit".to_string(),
    }));
    let service = service(store.clone(), gateway);

    let result = service.send(BUSINESS, PHONE).await;
    match result {
        Err(DomainError::Sms(SmsError::Throttled { resource })) => {
            assert_eq!(resource, "sms_gateway_limit")
        }
        other => panic!("Expected throttled error, got {:?}", other),
    }

    // The code was issued before delivery failed
    assert!(store.stored_code(BUSINESS, PHONE).is_some());
}

#[tokio::test]
async fn test_send_rejects_empty_input() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store.clone(), gateway.clone());

    assert!(matches!(
        service.send("", PHONE).await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.send(BUSINESS, "  ").await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.verify(BUSINESS, "", "123456").await,
        Err(DomainError::Validation { .. })
    ));
    assert!(gateway.sent().is_empty());
    assert!(store.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_verify_correct_code_once() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store, gateway.clone());

    service.send(BUSINESS, PHONE).await.unwrap();
    let code = gateway.sent()[0].args[0].clone();

    assert!(service.verify(BUSINESS, PHONE, &code).await.unwrap());

    let second = service.verify(BUSINESS, PHONE, &code).await;
    assert!(matches!(second, Err(DomainError::Code(CodeError::VerifyTooMany))));
}

#[tokio::test]
async fn test_verify_wrong_codes_then_locked() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store, gateway.clone());

    service.send(BUSINESS, PHONE).await.unwrap();
    let code = gateway.sent()[0].args[0].clone();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..3 {
        assert!(!service.verify(BUSINESS, PHONE, wrong).await.unwrap());
    }

    let locked = service.verify(BUSINESS, PHONE, &code).await;
    assert!(matches!(locked, Err(DomainError::Code(CodeError::VerifyTooMany))));
}

#[tokio::test]
async fn test_verify_without_code_is_system_error() {
    let store = Arc::new(MockCodeStore::new(false));
    let gateway = Arc::new(RecordingGateway::new());
    let service = service(store, gateway);

    let result = service.verify(BUSINESS, PHONE, "123456").await;
    assert!(matches!(result, Err(DomainError::Code(CodeError::System { .. }))));
}

#[tokio::test]
async fn test_service_accepts_trait_object_gateway() {
    let store = Arc::new(MockCodeStore::new(false));
    let recording = Arc::new(RecordingGateway::new());
    let gateway: Arc<dyn MessageGateway> = recording.clone();
    let service = CodeService::new(store, gateway, VerificationConfig::default());

    service.send("register", PHONE).await.unwrap();
    assert_eq!(recording.sent().len(), 1);
}
