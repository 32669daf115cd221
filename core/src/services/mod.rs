//! Business services and the capability traits they depend on.

pub mod limiter;
pub mod sms;
pub mod verification;

// Re-export commonly used types
pub use limiter::SlidingWindowLimiter;
pub use sms::MessageGateway;
pub use verification::{generate_code, CodeService};
