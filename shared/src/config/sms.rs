//! SMS provider and delivery pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider implementation selected for one entry of [`SmsConfig::providers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Logs messages instead of delivering them
    #[default]
    Mock,
    /// JSON over HTTP provider endpoint
    Http,
}

/// How several providers are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailoverStrategy {
    /// Try providers in order until one succeeds
    #[default]
    Sequential,
    /// Stick to one provider, switch after too many consecutive timeouts
    Threshold,
}

/// One SMS provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name used in logs
    pub name: String,

    #[serde(default)]
    pub kind: ProviderKind,

    /// Send endpoint for HTTP providers
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for HTTP providers
    #[serde(default)]
    pub api_key: Option<String>,

    /// Signature attached to every message
    #[serde(default)]
    pub sign_name: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

impl ProviderConfig {
    /// Mock provider with the given name
    pub fn mock(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProviderKind::Mock,
            endpoint: None,
            api_key: None,
            sign_name: None,
            timeout_ms: default_request_timeout_ms(),
        }
    }

    /// HTTP provider posting to `endpoint`
    pub fn http(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Http,
            endpoint: Some(endpoint.into()),
            ..Self::mock(name)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// SMS delivery pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Providers in priority order
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub strategy: FailoverStrategy,

    /// Consecutive timeouts tolerated before the threshold strategy switches provider
    #[serde(default = "default_timeout_threshold")]
    pub timeout_threshold: u32,

    /// Gate every send behind the sliding window limiter
    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    /// Limiter key shared by every instance sending through this pipeline
    #[serde(default = "default_rate_limit_key")]
    pub rate_limit_key: String,

    /// Persist throttled sends for the background retry worker
    #[serde(default = "default_true")]
    pub retry_enabled: bool,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            strategy: FailoverStrategy::default(),
            timeout_threshold: default_timeout_threshold(),
            rate_limit_enabled: true,
            rate_limit_key: default_rate_limit_key(),
            retry_enabled: true,
        }
    }
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig::mock("mock")]
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_timeout_threshold() -> u32 {
    3
}

fn default_rate_limit_key() -> String {
    String::from("sms_gateway_limit")
}

fn default_true() -> bool {
    true
}
