//! Mock SMS Gateway Implementation
//!
//! A gateway for development and testing that logs messages instead of
//! delivering them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use re_core::errors::SmsError;
use re_core::services::MessageGateway;
use re_shared::utils::phone::mask_recipients;

/// Mock SMS gateway for development and testing
///
/// This implementation:
/// - Logs every message with masked recipients
/// - Tracks message count for testing
/// - Optionally simulates provider failures
#[derive(Clone)]
pub struct MockGateway {
    /// Name used in logs
    name: String,
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockGateway {
    /// Create a new mock gateway
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, false)
    }

    /// Create a mock gateway with configurable failure simulation
    pub fn with_options(name: impl Into<String>, simulate_failure: bool) -> Self {
        Self {
            name: name.into(),
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageGateway for MockGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        let masked = mask_recipients(recipients);

        if self.simulate_failure {
            warn!(provider = %self.name, phone = %masked, "Mock gateway simulating failure");
            return Err(SmsError::provider(&self.name, "simulated sending failure"));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "sms_service",
            provider = %self.name,
            phone = %masked,
            template_id = template_id,
            message_number = count,
            "SMS sent successfully (mock)"
        );
        debug!(target: "sms_service", provider = %self.name, args = ?args, "Mock SMS content");

        Ok(())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
