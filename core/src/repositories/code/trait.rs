//! Code store trait defining the verification code state machine.

use async_trait::async_trait;

use crate::errors::CodeError;

/// Per `(business, phone)` verification code storage
///
/// Each operation runs its whole read-decide-write sequence atomically for the
/// key, so concurrent requests for the same phone observe a single order.
///
/// # Implementations
/// - Redis backed with Lua scripts, safe across instances
/// - Process-local with a single lock, for one-instance deployments and tests
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store a freshly generated code
    ///
    /// # Arguments
    /// * `business` - Business scope of the code (e.g. `login`)
    /// * `phone` - Recipient phone number
    /// * `code` - The generated code
    ///
    /// # Returns
    /// * `Ok(())` - No live record, or the previous one is past its cooldown and was replaced
    /// * `Err(CodeError::SendTooFrequent)` - A code was issued within the cooldown
    /// * `Err(CodeError::System)` - Storage fault or corrupted record
    async fn issue_code(&self, business: &str, phone: &str, code: &str) -> Result<(), CodeError>;

    /// Check a user supplied code
    ///
    /// # Returns
    /// * `Ok(true)` - Matched; the record is spent and never matches again
    /// * `Ok(false)` - Mismatch; one attempt consumed
    /// * `Err(CodeError::VerifyTooMany)` - Attempts exhausted or code already used
    /// * `Err(CodeError::System)` - No record, expired record or storage fault
    async fn verify_code(&self, business: &str, phone: &str, input: &str) -> Result<bool, CodeError>;
}
