use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use re_core::errors::{SmsError, SmsErrorKind};
use re_core::services::MessageGateway;

// Active index in the high half, consecutive timeouts in the low half
fn pack(index: u32, timeouts: u32) -> u64 {
    (u64::from(index) << 32) | u64::from(timeouts)
}

fn unpack(state: u64) -> (u32, u32) {
    ((state >> 32) as u32, state as u32)
}

/// Sticks to one gateway and switches after too many consecutive timeouts
///
/// The active index and the timeout counter live in one atomic word, so moving
/// to the next gateway and resetting the counter is a single compare-and-swap:
/// among callers that saw the same overloaded gateway exactly one switches.
pub struct ThresholdFailoverGateway {
    gateways: Vec<Arc<dyn MessageGateway>>,
    threshold: u32,
    state: AtomicU64,
}

impl ThresholdFailoverGateway {
    /// Create a new threshold failover gateway
    ///
    /// # Arguments
    ///
    /// * `gateways` - Providers in priority order; the first one starts active
    /// * `threshold` - Consecutive timeouts tolerated; one more triggers a switch
    pub fn new(gateways: Vec<Arc<dyn MessageGateway>>, threshold: u32) -> Self {
        info!(
            providers = ?gateways.iter().map(|g| g.provider_name()).collect::<Vec<_>>(),
            threshold = threshold,
            "Initializing threshold failover SMS gateway"
        );
        Self {
            gateways,
            threshold,
            state: AtomicU64::new(pack(0, 0)),
        }
    }

    /// Index of the gateway currently receiving traffic
    pub fn active_index(&self) -> usize {
        unpack(self.state.load(Ordering::Acquire)).0 as usize
    }

    /// Consecutive timeouts of the active gateway
    pub fn consecutive_timeouts(&self) -> u32 {
        unpack(self.state.load(Ordering::Acquire)).1
    }

    /// Resolve the gateway for this call, switching first if the counter is over the threshold
    fn select(&self) -> u32 {
        let len = self.gateways.len() as u32;
        let (index, timeouts) = unpack(self.state.load(Ordering::Acquire));
        if timeouts <= self.threshold {
            return index;
        }

        let next = (index + 1) % len;
        let switched = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (i, t) = unpack(current);
                (i == index && t > self.threshold).then(|| pack(next, 0))
            });

        match switched {
            Ok(_) => {
                warn!(
                    from = self.gateways[index as usize].provider_name(),
                    to = self.gateways[next as usize].provider_name(),
                    timeouts = timeouts,
                    "Too many consecutive timeouts, switching SMS provider"
                );
                next
            }
            // Another caller switched first; use whatever is active now
            Err(current) => unpack(current).0,
        }
    }

    fn record_success(&self, index: u32) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (i, t) = unpack(current);
                (i == index && t != 0).then(|| pack(i, 0))
            });
    }

    fn record_timeout(&self, index: u32) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (i, t) = unpack(current);
                (i == index).then(|| pack(i, t.saturating_add(1)))
            });
    }
}

#[async_trait]
impl MessageGateway for ThresholdFailoverGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        if self.gateways.is_empty() {
            return Err(SmsError::AllProvidersFailed { attempted: 0 });
        }

        let index = self.select();
        let gateway = &self.gateways[index as usize];

        match gateway.send(template_id, args, recipients).await {
            Ok(()) => {
                self.record_success(index);
                Ok(())
            }
            Err(e) => {
                if e.kind() == SmsErrorKind::Timeout {
                    self.record_timeout(index);
                }
                Err(e)
            }
        }
    }

    fn provider_name(&self) -> &str {
        "threshold-failover"
    }
}
