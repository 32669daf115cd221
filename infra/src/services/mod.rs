//! Sliding window rate limiter implementations

pub mod local_rate_limiter;
pub mod rate_limiter;


pub use local_rate_limiter::LocalSlidingWindowLimiter;
pub use rate_limiter::RedisSlidingWindowLimiter;
