//! MySQL implementation of the RetryStore trait.
//!
//! Throttled sends are kept in `sms_retry_jobs`. Arguments and recipients are
//! stored as JSON text; status uses the numeric values of `RetryStatus`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use re_core::domain::entities::retry_job::{NewRetryJob, RetryJob, RetryStatus};
use re_core::errors::DomainError;
use re_core::repositories::RetryStore;

use crate::InfrastructureError;

const COLUMNS: &str = "id, template_id, args, recipients, status, attempts, created_at, updated_at";

/// MySQL implementation of RetryStore
pub struct MySqlRetryJobRepository {
    pool: MySqlPool,
}

impl MySqlRetryJobRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the `sms_retry_jobs` table when it does not exist yet
    pub async fn create_table_if_not_exists(&self) -> Result<(), InfrastructureError> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS sms_retry_jobs (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                template_id VARCHAR(128) NOT NULL,
                args TEXT NOT NULL,
                recipients TEXT NOT NULL,
                status TINYINT NOT NULL,
                attempts INT UNSIGNED NOT NULL DEFAULT 0,
                created_at TIMESTAMP(3) NOT NULL,
                updated_at TIMESTAMP(3) NOT NULL,
                INDEX idx_status_attempts (status, attempts)
            )
        "#;

        sqlx::query(query).execute(&self.pool).await?;
        tracing::debug!("sms_retry_jobs table ready");
        Ok(())
    }

    fn encode_list(values: &[String]) -> Result<String, DomainError> {
        serde_json::to_string(values).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode retry job payload: {}", e),
        })
    }

    fn decode_list(raw: &str, column: &str) -> Result<Vec<String>, DomainError> {
        serde_json::from_str(raw).map_err(|e| DomainError::Internal {
            message: format!("Invalid {} payload: {}", column, e),
        })
    }

    fn row_to_job(row: &sqlx::mysql::MySqlRow) -> Result<RetryJob, DomainError> {
        let column_error = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let args: String = row.try_get("args").map_err(|e| column_error("args", e))?;
        let recipients: String = row
            .try_get("recipients")
            .map_err(|e| column_error("recipients", e))?;
        let status: i8 = row.try_get("status").map_err(|e| column_error("status", e))?;

        Ok(RetryJob {
            id: row.try_get("id").map_err(|e| column_error("id", e))?,
            template_id: row
                .try_get("template_id")
                .map_err(|e| column_error("template_id", e))?,
            args: Self::decode_list(&args, "args")?,
            recipients: Self::decode_list(&recipients, "recipients")?,
            status: RetryStatus::from_i8(status).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown retry job status: {}", status),
            })?,
            attempts: row.try_get("attempts").map_err(|e| column_error("attempts", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_error("updated_at", e))?,
        })
    }

    async fn update_status(&self, id: i64, status: RetryStatus) -> Result<(), DomainError> {
        let query = if status == RetryStatus::Failed {
            "UPDATE sms_retry_jobs SET status = ?, attempts = attempts + 1, updated_at = ? WHERE id = ?"
        } else {
            "UPDATE sms_retry_jobs SET status = ?, updated_at = ? WHERE id = ?"
        };

        let result = sqlx::query(query)
            .bind(status.as_i8())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update retry job {}: {}", id, e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Internal {
                message: format!("Retry job {} not found", id),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RetryStore for MySqlRetryJobRepository {
    async fn store(&self, job: NewRetryJob) -> Result<i64, DomainError> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO sms_retry_jobs (
                template_id, args, recipients, status, attempts, created_at, updated_at
            ) VALUES (?, ?, ?, ?, 0, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&job.template_id)
            .bind(Self::encode_list(&job.args)?)
            .bind(Self::encode_list(&job.recipients)?)
            .bind(RetryStatus::Pending.as_i8())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to store retry job: {}", e),
            })?;

        Ok(result.last_insert_id() as i64)
    }

    async fn find_retry_jobs(&self, max_retries: u32, limit: u32) -> Result<Vec<RetryJob>, DomainError> {
        let query = format!(
            "SELECT {} FROM sms_retry_jobs WHERE status IN (?, ?) AND attempts < ? ORDER BY id LIMIT ?",
            COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(RetryStatus::Failed.as_i8())
            .bind(RetryStatus::Pending.as_i8())
            .bind(max_retries)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find retry jobs: {}", e),
            })?;

        rows.iter().map(Self::row_to_job).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RetryJob>, DomainError> {
        let query = format!("SELECT {} FROM sms_retry_jobs WHERE id = ? LIMIT 1", COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find retry job {}: {}", id, e),
            })?;

        row.as_ref().map(Self::row_to_job).transpose()
    }

    async fn mark_succeeded(&self, id: i64) -> Result<(), DomainError> {
        self.update_status(id, RetryStatus::Succeeded).await
    }

    async fn mark_failed(&self, id: i64) -> Result<(), DomainError> {
        self.update_status(id, RetryStatus::Failed).await
    }
}
