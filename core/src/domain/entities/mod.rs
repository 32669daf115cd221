//! Domain entities representing core business objects.

pub mod code_record;
pub mod retry_job;

// Re-export commonly used types
pub use code_record::{code_key, CodeRecord, CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, SPENT_ATTEMPTS};
pub use retry_job::{NewRetryJob, RetryJob, RetryStatus};
