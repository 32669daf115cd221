//! In-process verification code store
//!
//! Mirrors the Redis store for single-instance deployments: one lock guards
//! the whole map, so every issue or verify is a single critical section.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use re_core::domain::entities::{code_key, CodeRecord};
use re_core::errors::CodeError;
use re_core::repositories::CodeStore;
use re_shared::config::VerificationConfig;
use re_shared::utils::phone::mask_phone;

struct Entry {
    record: CodeRecord,
    issued: Instant,
    expires_at: Instant,
}

/// Verification code store kept in process memory
pub struct LocalCodeCache {
    entries: Mutex<HashMap<String, Entry>>,
    config: VerificationConfig,
}

impl LocalCodeCache {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Number of live codes
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CodeStore for LocalCodeCache {
    async fn issue_code(&self, business: &str, phone: &str, code: &str) -> Result<(), CodeError> {
        let key = code_key(business, phone);
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        // Expired codes are dropped here, the store's only write path
        entries.retain(|_, entry| entry.expires_at > now);

        if let Some(entry) = entries.get(&key) {
            if now.duration_since(entry.issued) < self.config.cooldown() {
                return Err(CodeError::SendTooFrequent);
            }
        }

        entries.insert(
            key,
            Entry {
                record: CodeRecord::new(code, self.config.max_attempts, Utc::now().timestamp_millis()),
                issued: now,
                expires_at: now + self.config.code_ttl(),
            },
        );
        debug!(business = business, phone = %mask_phone(phone), "Verification code stored");
        Ok(())
    }

    async fn verify_code(&self, business: &str, phone: &str, input: &str) -> Result<bool, CodeError> {
        let key = code_key(business, phone);
        let mut entries = self.entries.lock().await;

        let live = matches!(entries.get(&key), Some(entry) if entry.expires_at > Instant::now());
        if !live {
            entries.remove(&key);
            return Err(CodeError::system("verification code missing or expired"));
        }

        match entries.get_mut(&key) {
            Some(entry) => entry.record.verify(input),
            None => Err(CodeError::system("verification code missing or expired")),
        }
    }
}
