//! Shared utilities and configuration for the verification code workspace
//!
//! This crate provides functionality used by both the domain (`re_core`) and
//! the infrastructure (`re_infra`) crates:
//! - Configuration types with documented defaults
//! - Tracing subscriber initialization
//! - Phone number helpers (log masking)

pub mod config;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CodeStoreBackend, DatabaseConfig, Environment, FailoverStrategy,
    LogFormat, LoggingConfig, ProviderConfig, ProviderKind, SmsConfig, VerificationConfig,
};
pub use utils::phone;
