//! # Verification Core
//!
//! Domain layer of the verification code engine.
//! This crate contains the code and retry job entities, the store, limiter and
//! gateway contracts implemented by `re_infra`, the error taxonomy, and the
//! `CodeService` that ties a code store to a message gateway.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{code_key, CodeRecord, NewRetryJob, RetryJob, RetryStatus};
pub use errors::{CodeError, DomainError, DomainResult, LimiterError, SmsError, SmsErrorKind};
pub use repositories::{CodeStore, InMemoryRetryStore, RetryStore};
pub use services::{generate_code, CodeService, MessageGateway, SlidingWindowLimiter};
