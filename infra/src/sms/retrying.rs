//! Durable retry decorator
//!
//! A send rejected for throttling is persisted as a retry job so the
//! [`RetryWorker`](super::RetryWorker) can deliver it later.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use re_core::domain::entities::NewRetryJob;
use re_core::errors::{SmsError, SmsErrorKind};
use re_core::repositories::RetryStore;
use re_core::services::MessageGateway;
use re_shared::utils::phone::mask_recipients;

/// Persists throttled sends for background retry
pub struct RetryingGateway {
    inner: Arc<dyn MessageGateway>,
    store: Arc<dyn RetryStore>,
}

impl RetryingGateway {
    pub fn new(inner: Arc<dyn MessageGateway>, store: Arc<dyn RetryStore>) -> Self {
        Self { inner, store }
    }

    /// The wrapped gateway; resubmissions go here so they are never persisted twice
    pub fn inner(&self) -> Arc<dyn MessageGateway> {
        self.inner.clone()
    }
}

#[async_trait]
impl MessageGateway for RetryingGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        let err = match self.inner.send(template_id, args, recipients).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        if err.kind() != SmsErrorKind::Throttled {
            return Err(err);
        }

        match self.store.store(NewRetryJob::new(template_id, args, recipients)).await {
            Ok(id) => info!(
                job_id = id,
                template_id = template_id,
                phone = %mask_recipients(recipients),
                "Throttled SMS stored for retry"
            ),
            Err(store_err) => error!(
                template_id = template_id,
                phone = %mask_recipients(recipients),
                error = %store_err,
                "Failed to store throttled SMS for retry"
            ),
        }

        Err(err)
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
