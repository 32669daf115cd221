//! Error types of the code store, the limiter and the message gateways

use thiserror::Error;

/// Code store errors
///
/// A wrong code is not an error: `verify_code` reports it as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Verification code requested too frequently")]
    SendTooFrequent,

    #[error("Too many verification attempts")]
    VerifyTooMany,

    #[error("Verification code store failure: {message}")]
    System { message: String },
}

impl CodeError {
    pub fn system(message: impl Into<String>) -> Self {
        CodeError::System {
            message: message.into(),
        }
    }
}

/// Sliding window limiter errors
///
/// A denied key is reported as `Ok(true)` by the limiter, never as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimiterError {
    #[error("Rate limiter unavailable: {message}")]
    Unavailable { message: String },
}

/// Closed classification of gateway failures used by the decorators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmsErrorKind {
    Throttled,
    Timeout,
    Other,
}

/// Message gateway errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    #[error("SMS sending throttled: {resource}")]
    Throttled { resource: String },

    #[error("SMS rate limiter unavailable: {message}")]
    LimiterUnavailable { message: String },

    #[error("All {attempted} SMS providers failed")]
    AllProvidersFailed { attempted: usize },

    #[error("SMS provider {provider} timed out")]
    Timeout { provider: String },

    #[error("SMS provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
}

impl SmsError {
    pub fn kind(&self) -> SmsErrorKind {
        match self {
            SmsError::Throttled { .. } => SmsErrorKind::Throttled,
            SmsError::Timeout { .. } => SmsErrorKind::Timeout,
            SmsError::LimiterUnavailable { .. }
            | SmsError::AllProvidersFailed { .. }
            | SmsError::Provider { .. } => SmsErrorKind::Other,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        SmsError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<LimiterError> for SmsError {
    fn from(err: LimiterError) -> Self {
        match err {
            LimiterError::Unavailable { message } => SmsError::LimiterUnavailable { message },
        }
    }
}
