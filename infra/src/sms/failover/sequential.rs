use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use re_core::errors::{SmsError, SmsErrorKind};
use re_core::services::MessageGateway;

/// Tries gateways in order and returns on the first success
pub struct SequentialFailoverGateway {
    gateways: Vec<Arc<dyn MessageGateway>>,
}

impl SequentialFailoverGateway {
    pub fn new(gateways: Vec<Arc<dyn MessageGateway>>) -> Self {
        info!(
            providers = ?gateways.iter().map(|g| g.provider_name()).collect::<Vec<_>>(),
            "Initializing sequential failover SMS gateway"
        );
        Self { gateways }
    }
}

#[async_trait]
impl MessageGateway for SequentialFailoverGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        let mut last_throttle = None;
        let mut all_throttled = true;

        for gateway in &self.gateways {
            match gateway.send(template_id, args, recipients).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        provider = gateway.provider_name(),
                        error = %e,
                        "SMS provider failed, trying next"
                    );
                    if e.kind() == SmsErrorKind::Throttled {
                        last_throttle = Some(e);
                    } else {
                        all_throttled = false;
                    }
                }
            }
        }

        // Throttling on every provider stays throttling so it can be retried later
        match last_throttle {
            Some(throttle) if all_throttled => Err(throttle),
            _ => Err(SmsError::AllProvidersFailed {
                attempted: self.gateways.len(),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "sequential-failover"
    }
}
