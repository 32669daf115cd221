//! Tests for timeout-threshold failover

use std::sync::Arc;

use re_core::errors::SmsError;
use re_core::services::MessageGateway;

use super::support::{args, recipients, timeout, ScriptedGateway};
use crate::sms::ThresholdFailoverGateway;

#[tokio::test]
async fn test_switches_after_threshold_plus_one_timeouts() {
    let primary = Arc::new(ScriptedGateway::always("primary", Err(timeout("primary"))));
    let backup = Arc::new(ScriptedGateway::ok("backup"));
    let gateway = ThresholdFailoverGateway::new(vec![primary.clone(), backup.clone()], 2);

    // threshold + 1 timeouts stay on the primary
    for _ in 0..3 {
        let result = gateway.send("tpl", &args(), &recipients()).await;
        assert_eq!(result, Err(timeout("primary")));
        assert_eq!(gateway.active_index(), 0);
    }
    assert_eq!(gateway.consecutive_timeouts(), 3);

    gateway.send("tpl", &args(), &recipients()).await.unwrap();

    assert_eq!(gateway.active_index(), 1);
    assert_eq!(gateway.consecutive_timeouts(), 0);
    assert_eq!(primary.calls(), 3);
    assert_eq!(backup.calls(), 1);
}

#[tokio::test]
async fn test_success_resets_counter() {
    let primary = Arc::new(ScriptedGateway::scripted(
        "primary",
        vec![Err(timeout("primary")), Err(timeout("primary")), Ok(())],
        Err(timeout("primary")),
    ));
    let backup = Arc::new(ScriptedGateway::ok("backup"));
    let gateway = ThresholdFailoverGateway::new(vec![primary.clone(), backup.clone()], 2);

    for _ in 0..2 {
        assert!(gateway.send("tpl", &args(), &recipients()).await.is_err());
    }
    gateway.send("tpl", &args(), &recipients()).await.unwrap();
    assert_eq!(gateway.consecutive_timeouts(), 0);

    // Counting starts over: three more timeouts are needed before a switch
    for _ in 0..3 {
        assert!(gateway.send("tpl", &args(), &recipients()).await.is_err());
    }
    assert_eq!(gateway.active_index(), 0);
    assert_eq!(backup.calls(), 0);
}

#[tokio::test]
async fn test_other_errors_do_not_count() {
    let primary = Arc::new(ScriptedGateway::always(
        "primary",
        Err(SmsError::provider("primary", "invalid template")),
    ));
    let backup = Arc::new(ScriptedGateway::ok("backup"));
    let gateway = ThresholdFailoverGateway::new(vec![primary.clone(), backup.clone()], 1);

    for _ in 0..5 {
        let result = gateway.send("tpl", &args(), &recipients()).await;
        assert!(matches!(result, Err(SmsError::Provider { .. })));
    }

    assert_eq!(gateway.consecutive_timeouts(), 0);
    assert_eq!(gateway.active_index(), 0);
    assert_eq!(backup.calls(), 0);
}

#[tokio::test]
async fn test_index_wraps_around() {
    let first = Arc::new(ScriptedGateway::always("first", Err(timeout("first"))));
    let second = Arc::new(ScriptedGateway::always("second", Err(timeout("second"))));
    let gateway = ThresholdFailoverGateway::new(vec![first.clone(), second.clone()], 0);

    // threshold 0: a single timeout is enough to move on with the next call
    let _ = gateway.send("tpl", &args(), &recipients()).await;
    let _ = gateway.send("tpl", &args(), &recipients()).await;
    assert_eq!(gateway.active_index(), 1);

    let _ = gateway.send("tpl", &args(), &recipients()).await;
    assert_eq!(gateway.active_index(), 0);
    assert_eq!(first.calls(), 2);
    assert_eq!(second.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_callers_switch_once() {
    let primary = Arc::new(ScriptedGateway::always("primary", Err(timeout("primary"))));
    let backup = Arc::new(ScriptedGateway::ok("backup"));
    let third = Arc::new(ScriptedGateway::ok("third"));
    let gateway = Arc::new(ThresholdFailoverGateway::new(
        vec![primary.clone(), backup.clone(), third.clone()],
        2,
    ));

    for _ in 0..3 {
        let _ = gateway.send("tpl", &args(), &recipients()).await;
    }

    let mut handles = Vec::new();
    for _ in 0..32 {
        let gateway = gateway.clone();
        handles.push(tokio::spawn(async move {
            gateway.send("tpl", &args(), &recipients()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // A second switch would have routed traffic to the third provider
    assert_eq!(gateway.active_index(), 1);
    assert_eq!(primary.calls(), 3);
    assert_eq!(backup.calls(), 32);
    assert_eq!(third.calls(), 0);
}

#[tokio::test]
async fn test_empty_provider_list() {
    let gateway = ThresholdFailoverGateway::new(Vec::new(), 3);
    let result = gateway.send("tpl", &args(), &recipients()).await;
    assert_eq!(result, Err(SmsError::AllProvidersFailed { attempted: 0 }));
}
