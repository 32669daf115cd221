//! Background worker resubmitting stored retry jobs
//!
//! Each cycle picks a bounded batch of `Pending`/`Failed` jobs under the retry
//! ceiling and resubmits them through the inner gateway with a fixed number of
//! concurrent workers.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use re_core::domain::entities::RetryJob;
use re_core::errors::DomainError;
use re_core::repositories::RetryStore;
use re_core::services::MessageGateway;
use re_shared::config::VerificationConfig;
use re_shared::utils::phone::mask_recipients;

/// Resubmits throttled sends on a fixed interval
pub struct RetryWorker {
    gateway: Arc<dyn MessageGateway>,
    store: Arc<dyn RetryStore>,
    interval: Duration,
    workers: usize,
    batch_size: u32,
    max_retries: u32,
}

impl RetryWorker {
    /// Create a new retry worker
    ///
    /// # Arguments
    ///
    /// * `gateway` - Gateway used for resubmission; must not persist jobs itself
    /// * `store` - Store holding the jobs
    /// * `config` - Poll interval, worker count, batch size and retry ceiling
    pub fn new(
        gateway: Arc<dyn MessageGateway>,
        store: Arc<dyn RetryStore>,
        config: &VerificationConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            interval: config.retry_poll_interval(),
            workers: config.retry_workers.max(1),
            batch_size: config.retry_batch_size,
            max_retries: config.max_retries,
        }
    }

    /// Run a single retry cycle
    ///
    /// # Returns
    /// * `Ok(RetryCycleReport)` - Counts of picked, delivered and failed jobs
    /// * `Err(DomainError)` - The store could not be queried
    pub async fn run_once(&self) -> Result<RetryCycleReport, DomainError> {
        let jobs = self
            .store
            .find_retry_jobs(self.max_retries, self.batch_size)
            .await?;

        let mut report = RetryCycleReport {
            picked: jobs.len(),
            ..Default::default()
        };
        if jobs.is_empty() {
            debug!("No SMS retry jobs pending");
            return Ok(report);
        }

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        for job in jobs {
            let permit = permits.clone().acquire_owned().await.map_err(|e| DomainError::Internal {
                message: format!("Retry worker pool closed: {}", e),
            })?;
            let gateway = self.gateway.clone();
            let store = self.store.clone();
            tasks.spawn(async move {
                let _permit = permit;
                resubmit(gateway.as_ref(), store.as_ref(), job).await
            });
        }

        while let Some(outcome) = tasks.join_next().await {
            match outcome {
                Ok(true) => report.succeeded += 1,
                Ok(false) => report.failed += 1,
                Err(e) => {
                    error!(error = %e, "SMS retry task panicked");
                    report.failed += 1;
                }
            }
        }

        info!(
            picked = report.picked,
            succeeded = report.succeeded,
            failed = report.failed,
            "SMS retry cycle completed"
        );
        Ok(report)
    }

    /// Start the worker as a background task
    ///
    /// The first cycle runs one interval after start. Dropping the returned
    /// handle leaves the task running; call [`RetryWorkerHandle::shutdown`] to
    /// stop it after the current cycle.
    pub fn start_background_task(self: Arc<Self>) -> RetryWorkerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs(),
                workers = self.workers,
                "SMS retry worker started"
            );

            let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = self.run_once().await {
                            error!(error = %e, "SMS retry cycle failed");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("SMS retry worker stopped");
        });

        RetryWorkerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

async fn resubmit(gateway: &dyn MessageGateway, store: &dyn RetryStore, job: RetryJob) -> bool {
    match gateway.send(&job.template_id, &job.args, &job.recipients).await {
        Ok(()) => {
            if let Err(e) = store.mark_succeeded(job.id).await {
                error!(job_id = job.id, error = %e, "Failed to mark SMS retry job as succeeded");
            }
            debug!(job_id = job.id, phone = %mask_recipients(&job.recipients), "SMS retry delivered");
            true
        }
        Err(send_err) => {
            if let Err(e) = store.mark_failed(job.id).await {
                error!(job_id = job.id, error = %e, "Failed to mark SMS retry job as failed");
            }
            warn!(
                job_id = job.id,
                attempts = job.attempts + 1,
                error = %send_err,
                "SMS retry failed"
            );
            false
        }
    }
}

/// Handle to a running retry worker
pub struct RetryWorkerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RetryWorkerHandle {
    /// Signal the worker to stop and wait for it
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "SMS retry worker terminated abnormally");
        }
    }
}

/// Result of one retry cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetryCycleReport {
    /// Jobs picked from the store
    pub picked: usize,
    /// Jobs delivered and marked succeeded
    pub succeeded: usize,
    /// Jobs whose resubmission failed
    pub failed: usize,
}
