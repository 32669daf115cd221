//! SMS Gateway Module
//!
//! This module provides the SMS providers and the resilience decorators that
//! compose into the delivery pipeline used by the code service.
//!
//! ## Features
//!
//! - **Providers**: HTTP provider and a logging mock for development
//! - **Rate limiting**: shared sliding window budget for all instances
//! - **Failover**: sequential fallback or timeout-threshold switching
//! - **Durable retry**: throttled sends are stored and retried in the background
//! - **Security**: phone number masking in logs

use std::sync::Arc;

use re_core::repositories::RetryStore;
use re_core::services::{MessageGateway, SlidingWindowLimiter};
use re_shared::config::{FailoverStrategy, ProviderConfig, ProviderKind, SmsConfig};

use crate::InfrastructureError;

pub mod failover;
pub mod http;
pub mod mock;
pub mod rate_limited;
pub mod retry_worker;
pub mod retrying;

// Re-export commonly used types
pub use failover::{SequentialFailoverGateway, ThresholdFailoverGateway};
pub use http::HttpGateway;
pub use mock::MockGateway;
pub use rate_limited::RateLimitedGateway;
pub use retry_worker::{RetryCycleReport, RetryWorker, RetryWorkerHandle};
pub use retrying::RetryingGateway;

#[cfg(test)]
mod tests;

/// Delivery pipeline assembled from configuration
pub struct BuiltGateway {
    /// Outermost gateway, handed to the code service
    pub gateway: Arc<dyn MessageGateway>,
    /// Gateway below the durable retry layer, for the retry worker
    pub retry_inner: Option<Arc<dyn MessageGateway>>,
}

/// Create a single provider from its configuration
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn MessageGateway>, InfrastructureError> {
    match config.kind {
        ProviderKind::Mock => Ok(Arc::new(MockGateway::new(config.name.clone()))),
        ProviderKind::Http => Ok(Arc::new(HttpGateway::new(config)?)),
    }
}

/// Compose the delivery pipeline described by `config`
///
/// Layers, innermost first:
/// 1. the providers, combined by the failover strategy when there are several
/// 2. rate limiting with `limiter`, when enabled
/// 3. durable retry into `retry_store`, when enabled
///
/// # Returns
///
/// The pipeline, plus the layer below durable retry when retry is enabled so
/// the retry worker resubmits without storing duplicates.
pub fn build_gateway(
    config: &SmsConfig,
    limiter: Arc<dyn SlidingWindowLimiter>,
    retry_store: Arc<dyn RetryStore>,
) -> Result<BuiltGateway, InfrastructureError> {
    if config.providers.is_empty() {
        return Err(InfrastructureError::Config(
            "at least one SMS provider must be configured".to_string(),
        ));
    }

    let mut providers = config
        .providers
        .iter()
        .map(create_provider)
        .collect::<Result<Vec<_>, _>>()?;

    let mut gateway: Arc<dyn MessageGateway> = if providers.len() == 1 {
        providers.remove(0)
    } else {
        match config.strategy {
            FailoverStrategy::Sequential => Arc::new(SequentialFailoverGateway::new(providers)),
            FailoverStrategy::Threshold => {
                Arc::new(ThresholdFailoverGateway::new(providers, config.timeout_threshold))
            }
        }
    };

    if config.rate_limit_enabled {
        gateway = Arc::new(RateLimitedGateway::new(gateway, limiter, config.rate_limit_key.clone()));
    }

    if !config.retry_enabled {
        return Ok(BuiltGateway {
            gateway,
            retry_inner: None,
        });
    }

    let retrying = RetryingGateway::new(gateway, retry_store);
    let retry_inner = retrying.inner();
    Ok(BuiltGateway {
        gateway: Arc::new(retrying),
        retry_inner: Some(retry_inner),
    })
}
