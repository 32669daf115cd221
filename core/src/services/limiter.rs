//! Sliding window rate limiter contract

use async_trait::async_trait;

use crate::errors::LimiterError;

/// Admits at most `threshold` operations per key in any trailing window
///
/// Counting the window and recording an admitted call happen as one
/// indivisible step. Denied calls are not recorded.
#[async_trait]
pub trait SlidingWindowLimiter: Send + Sync {
    /// Evaluate and, when admitted, record one operation for `key`
    ///
    /// # Returns
    /// * `Ok(false)` - Admitted
    /// * `Ok(true)` - Denied, the window is full
    /// * `Err(LimiterError::Unavailable)` - The backing store could not answer
    async fn limit(&self, key: &str) -> Result<bool, LimiterError>;
}
