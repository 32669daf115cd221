//! In-memory implementation of RetryStore

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::retry_job::{NewRetryJob, RetryJob, RetryStatus};
use crate::errors::DomainError;

use super::r#trait::RetryStore;

/// Process-local retry store
///
/// Jobs are kept in id order, which is also creation order. Used when no
/// database is configured and by tests.
pub struct InMemoryRetryStore {
    jobs: Arc<RwLock<BTreeMap<i64, RetryJob>>>,
}

impl InMemoryRetryStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Snapshot of every stored job
    pub async fn all(&self) -> Vec<RetryJob> {
        self.jobs.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn update_status(&self, id: i64, status: RetryStatus) -> Result<(), DomainError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or_else(|| DomainError::Internal {
            message: format!("Retry job {} not found", id),
        })?;

        job.status = status;
        if status == RetryStatus::Failed {
            job.attempts += 1;
        }
        job.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for InMemoryRetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RetryStore for InMemoryRetryStore {
    async fn store(&self, job: NewRetryJob) -> Result<i64, DomainError> {
        let mut jobs = self.jobs.write().await;
        let id = jobs.keys().next_back().map_or(1, |last| last + 1);
        jobs.insert(id, job.into_job(id, Utc::now()));
        Ok(id)
    }

    async fn find_retry_jobs(&self, max_retries: u32, limit: u32) -> Result<Vec<RetryJob>, DomainError> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .values()
            .filter(|job| job.status.is_retriable() && job.attempts < max_retries)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RetryJob>, DomainError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn mark_succeeded(&self, id: i64) -> Result<(), DomainError> {
        self.update_status(id, RetryStatus::Succeeded).await
    }

    async fn mark_failed(&self, id: i64) -> Result<(), DomainError> {
        self.update_status(id, RetryStatus::Failed).await
    }
}
