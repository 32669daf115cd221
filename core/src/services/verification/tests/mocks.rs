//! Mock implementations for testing the verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::entities::code_record::{code_key, CodeRecord, DEFAULT_MAX_ATTEMPTS};
use crate::errors::{CodeError, SmsError};
use crate::repositories::code::CodeStore;
use crate::services::sms::MessageGateway;

// Mock code store with a fixed cooldown and no expiry
pub struct MockCodeStore {
    pub records: Arc<Mutex<HashMap<String, (CodeRecord, Instant)>>>,
    pub cooldown: Duration,
    pub should_fail: bool,
}

impl MockCodeStore {
    pub fn new(should_fail: bool) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            cooldown: Duration::from_secs(60),
            should_fail,
        }
    }

    pub fn stored_code(&self, business: &str, phone: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&code_key(business, phone))
            .map(|(record, _)| record.code.clone())
    }
}

#[async_trait]
impl CodeStore for MockCodeStore {
    async fn issue_code(&self, business: &str, phone: &str, code: &str) -> Result<(), CodeError> {
        if self.should_fail {
            return Err(CodeError::system("Code store error"));
        }
        let mut records = self.records.lock().unwrap();
        let key = code_key(business, phone);
        if let Some((_, issued)) = records.get(&key) {
            if issued.elapsed() < self.cooldown {
                return Err(CodeError::SendTooFrequent);
            }
        }
        records.insert(key, (CodeRecord::new(code, DEFAULT_MAX_ATTEMPTS, 0), Instant::now()));
        Ok(())
    }

    async fn verify_code(&self, business: &str, phone: &str, input: &str) -> Result<bool, CodeError> {
        if self.should_fail {
            return Err(CodeError::system("Code store error"));
        }
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&code_key(business, phone)) {
            Some((record, _)) => record.verify(input),
            None => Err(CodeError::system("code not found")),
        }
    }
}

/// A message captured by `RecordingGateway`
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub template_id: String,
    pub args: Vec<String>,
    pub recipients: Vec<String>,
}

// Gateway that records messages, or fails with a fixed error
pub struct RecordingGateway {
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
    pub failure: Option<SmsError>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub fn failing(error: SmsError) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.sent.lock().unwrap().push(SentMessage {
            template_id: template_id.to_string(),
            args: args.to_vec(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}
