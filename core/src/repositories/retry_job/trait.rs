//! Retry store trait defining the durable queue of throttled sends.

use async_trait::async_trait;

use crate::domain::entities::retry_job::{NewRetryJob, RetryJob};
use crate::errors::DomainError;

/// Repository trait for RetryJob persistence operations
///
/// Jobs are never deleted; a delivered job stays around as `Succeeded`.
#[async_trait]
pub trait RetryStore: Send + Sync {
    /// Persist a new job in `Pending` status
    ///
    /// # Returns
    /// * `Ok(i64)` - Store-assigned job id
    /// * `Err(DomainError)` - Persistence failed
    async fn store(&self, job: NewRetryJob) -> Result<i64, DomainError>;

    /// Find jobs the retry worker may resubmit
    ///
    /// Returns `Pending` or `Failed` jobs with fewer than `max_retries`
    /// attempts, oldest first, at most `limit` of them.
    async fn find_retry_jobs(&self, max_retries: u32, limit: u32) -> Result<Vec<RetryJob>, DomainError>;

    /// Find a job by id
    async fn find_by_id(&self, id: i64) -> Result<Option<RetryJob>, DomainError>;

    /// Mark a job as delivered
    async fn mark_succeeded(&self, id: i64) -> Result<(), DomainError>;

    /// Record a failed resubmission and bump the attempt counter
    async fn mark_failed(&self, id: i64) -> Result<(), DomainError>;
}
