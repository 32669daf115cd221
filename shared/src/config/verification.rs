//! Verification code and retry worker configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for code issuance, the gateway limiter and the background retry worker
///
/// All durations are stored in whole seconds so the struct maps directly onto
/// TOML files and `APP__VERIFICATION__*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum time between two issued codes for the same business and phone
    pub cooldown_secs: u64,

    /// Wrong guesses allowed before the code is locked
    pub max_attempts: i64,

    /// Lifetime of an issued code
    pub code_ttl_secs: u64,

    /// Sliding window length of the gateway limiter
    pub limiter_window_secs: u64,

    /// Admissions allowed per limiter window
    pub limiter_threshold: u64,

    /// Interval between two retry worker cycles
    pub retry_poll_interval_secs: u64,

    /// Concurrent resubmissions per retry cycle
    pub retry_workers: usize,

    /// Jobs picked per retry cycle
    pub retry_batch_size: u32,

    /// Resubmissions allowed per job before it is left alone
    pub max_retries: u32,

    /// Message template used for verification codes
    pub template_id: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60,
            max_attempts: 3,
            code_ttl_secs: 600,
            limiter_window_secs: 60,
            limiter_threshold: 100,
            retry_poll_interval_secs: 300,
            retry_workers: 4,
            retry_batch_size: 100,
            max_retries: 5,
            template_id: String::from("verification_code"),
        }
    }
}

impl VerificationConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_secs)
    }

    pub fn limiter_window(&self) -> Duration {
        Duration::from_secs(self.limiter_window_secs)
    }

    pub fn retry_poll_interval(&self) -> Duration {
        Duration::from_secs(self.retry_poll_interval_secs)
    }

    /// Code validity in whole minutes, as shown to the recipient
    pub fn code_ttl_minutes(&self) -> u64 {
        (self.code_ttl_secs / 60).max(1)
    }
}
