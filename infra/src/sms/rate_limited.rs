//! Rate limiting decorator for message gateways

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, warn};

use re_core::errors::SmsError;
use re_core::services::{MessageGateway, SlidingWindowLimiter};

/// Gates every send behind a sliding window limiter
///
/// All instances sharing the limiter key share one budget. A denied send never
/// reaches the inner gateway.
pub struct RateLimitedGateway {
    inner: Arc<dyn MessageGateway>,
    limiter: Arc<dyn SlidingWindowLimiter>,
    key: String,
}

impl RateLimitedGateway {
    pub fn new(
        inner: Arc<dyn MessageGateway>,
        limiter: Arc<dyn SlidingWindowLimiter>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            limiter,
            key: key.into(),
        }
    }
}

#[async_trait]
impl MessageGateway for RateLimitedGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        match self.limiter.limit(&self.key).await {
            Ok(false) => self.inner.send(template_id, args, recipients).await,
            Ok(true) => {
                warn!(key = %self.key, provider = self.inner.provider_name(), "SMS sending throttled");
                Err(SmsError::Throttled {
                    resource: self.key.clone(),
                })
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "SMS rate limiter unavailable");
                Err(e.into())
            }
        }
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
