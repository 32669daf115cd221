//! Failover strategies over an ordered list of gateways
//!
//! - [`SequentialFailoverGateway`] tries every provider in order on each send
//! - [`ThresholdFailoverGateway`] sticks to one provider and moves on after
//!   too many consecutive timeouts

mod sequential;
mod threshold;

pub use sequential::SequentialFailoverGateway;
pub use threshold::ThresholdFailoverGateway;
