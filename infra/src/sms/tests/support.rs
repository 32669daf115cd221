//! Scripted gateways and limiters shared by the SMS tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use re_core::errors::{LimiterError, SmsError};
use re_core::services::{MessageGateway, SlidingWindowLimiter};

pub fn args() -> Vec<String> {
    vec!["123456".to_string(), "10".to_string()]
}

pub fn recipients() -> Vec<String> {
    vec!["13800001234".to_string()]
}

pub fn timeout(provider: &str) -> SmsError {
    SmsError::Timeout {
        provider: provider.to_string(),
    }
}

pub fn throttled() -> SmsError {
    SmsError::Throttled {
        resource: "sms_gateway_limit".to_string(),
    }
}

/// Gateway replaying scripted outcomes, then falling back to a default one
pub struct ScriptedGateway {
    name: String,
    script: Mutex<VecDeque<Result<(), SmsError>>>,
    default: Result<(), SmsError>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn ok(name: &str) -> Self {
        Self::always(name, Ok(()))
    }

    pub fn always(name: &str, outcome: Result<(), SmsError>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            default: outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// Replay `outcomes` first, then keep returning `default`
    pub fn scripted(name: &str, outcomes: Vec<Result<(), SmsError>>, default: Result<(), SmsError>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(outcomes.into()),
            default,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageGateway for ScriptedGateway {
    async fn send(&self, _template_id: &str, _args: &[String], _recipients: &[String]) -> Result<(), SmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.default.clone())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

/// Limiter with a fixed answer
pub struct StaticLimiter(pub Result<bool, LimiterError>);

#[async_trait]
impl SlidingWindowLimiter for StaticLimiter {
    async fn limit(&self, _key: &str) -> Result<bool, LimiterError> {
        self.0.clone()
    }
}
