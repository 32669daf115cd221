//! Redis-backed verification code store
//!
//! Codes live in `phone_code:{business}:{phone}` hashes with the fields
//! `code`, `attempts` and `issued_at`. Issue and verify each run as one Lua
//! script, so concurrent requests from any number of instances are serialized
//! per key by Redis itself.

use async_trait::async_trait;
use chrono::Utc;
use redis::Script;
use tracing::{debug, error, warn};

use re_core::domain::entities::code_key;
use re_core::errors::CodeError;
use re_core::repositories::CodeStore;
use re_shared::config::VerificationConfig;
use re_shared::utils::phone::mask_phone;

use super::redis_client::RedisClient;

const ISSUE_OK: i64 = 0;
const ISSUE_TOO_FREQUENT: i64 = -1;

const VERIFY_MATCHED: i64 = 0;
const VERIFY_EXHAUSTED: i64 = -1;
const VERIFY_MISMATCH: i64 = -2;

/// Verification code store shared by every instance through Redis
pub struct RedisCodeCache {
    client: RedisClient,
    config: VerificationConfig,
    issue_script: Script,
    verify_script: Script,
}

impl RedisCodeCache {
    /// Create a new Redis code store
    ///
    /// # Arguments
    ///
    /// * `client` - Connected Redis client
    /// * `config` - Cooldown, attempt limit and TTL applied to every code
    pub fn new(client: RedisClient, config: VerificationConfig) -> Self {
        Self {
            client,
            config,
            issue_script: Script::new(include_str!("lua/issue_code.lua")),
            verify_script: Script::new(include_str!("lua/verify_code.lua")),
        }
    }
}

#[async_trait]
impl CodeStore for RedisCodeCache {
    async fn issue_code(&self, business: &str, phone: &str, code: &str) -> Result<(), CodeError> {
        let key = self.client.key(&code_key(business, phone));
        let cooldown_ms = self.config.cooldown().as_millis() as u64;
        let args = [
            code.to_string(),
            cooldown_ms.to_string(),
            self.config.max_attempts.to_string(),
            self.config.code_ttl_secs.to_string(),
            Utc::now().timestamp_millis().to_string(),
        ];

        let result = self
            .client
            .eval_i64(&self.issue_script, &[&key], &args)
            .await
            .map_err(|e| {
                error!(
                    business = business,
                    phone = %mask_phone(phone),
                    error = %e,
                    "Failed to issue verification code"
                );
                CodeError::system(e.to_string())
            })?;

        match result {
            ISSUE_OK => {
                debug!(business = business, phone = %mask_phone(phone), "Verification code stored");
                Ok(())
            }
            ISSUE_TOO_FREQUENT => Err(CodeError::SendTooFrequent),
            other => {
                warn!(
                    business = business,
                    phone = %mask_phone(phone),
                    result = other,
                    "Corrupted verification code record"
                );
                Err(CodeError::system(format!("corrupted code record ({})", other)))
            }
        }
    }

    async fn verify_code(&self, business: &str, phone: &str, input: &str) -> Result<bool, CodeError> {
        let key = self.client.key(&code_key(business, phone));

        let result = self
            .client
            .eval_i64(&self.verify_script, &[&key], &[input.to_string()])
            .await
            .map_err(|e| {
                error!(
                    business = business,
                    phone = %mask_phone(phone),
                    error = %e,
                    "Failed to verify code"
                );
                CodeError::system(e.to_string())
            })?;

        match result {
            VERIFY_MATCHED => Ok(true),
            VERIFY_MISMATCH => Ok(false),
            VERIFY_EXHAUSTED => Err(CodeError::VerifyTooMany),
            other => {
                debug!(
                    business = business,
                    phone = %mask_phone(phone),
                    result = other,
                    "No verification code to check"
                );
                Err(CodeError::system("verification code missing or expired"))
            }
        }
    }
}
