//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{CodeError, LimiterError, SmsError, SmsErrorKind};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Code(#[from] CodeError),

    #[error(transparent)]
    Sms(#[from] SmsError),
}

impl DomainError {
    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Code(err) => match err {
                CodeError::SendTooFrequent => "SEND_TOO_FREQUENT",
                CodeError::VerifyTooMany => "VERIFY_TOO_MANY",
                CodeError::System { .. } => "SYSTEM_ERROR",
            },
            DomainError::Sms(err) => match err {
                SmsError::Throttled { .. } => "SMS_THROTTLED",
                SmsError::LimiterUnavailable { .. } => "LIMITER_UNAVAILABLE",
                SmsError::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
                SmsError::Timeout { .. } => "PROVIDER_TIMEOUT",
                SmsError::Provider { .. } => "PROVIDER_ERROR",
            },
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
