//! Persisted SMS send waiting for a background retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Retry job status
///
/// The numeric values are the ones stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryStatus {
    /// Delivered by the retry worker
    Succeeded,
    /// A resubmission failed, eligible for another try
    Failed,
    /// Stored after throttling, not retried yet
    Pending,
}

impl RetryStatus {
    pub fn as_i8(self) -> i8 {
        match self {
            RetryStatus::Succeeded => 0,
            RetryStatus::Failed => 1,
            RetryStatus::Pending => 2,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(RetryStatus::Succeeded),
            1 => Some(RetryStatus::Failed),
            2 => Some(RetryStatus::Pending),
            _ => None,
        }
    }

    /// Whether the retry worker may pick a job in this status
    pub fn is_retriable(self) -> bool {
        matches!(self, RetryStatus::Failed | RetryStatus::Pending)
    }
}

/// SMS send captured for later resubmission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryJob {
    pub id: i64,
    pub template_id: String,
    pub args: Vec<String>,
    pub recipients: Vec<String>,
    pub status: RetryStatus,
    /// Resubmissions made so far
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of a job about to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRetryJob {
    pub template_id: String,
    pub args: Vec<String>,
    pub recipients: Vec<String>,
}

impl NewRetryJob {
    pub fn new(template_id: &str, args: &[String], recipients: &[String]) -> Self {
        Self {
            template_id: template_id.to_string(),
            args: args.to_vec(),
            recipients: recipients.to_vec(),
        }
    }

    /// Materialize the job with its store-assigned id
    pub fn into_job(self, id: i64, now: DateTime<Utc>) -> RetryJob {
        RetryJob {
            id,
            template_id: self.template_id,
            args: self.args,
            recipients: self.recipients,
            status: RetryStatus::Pending,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
