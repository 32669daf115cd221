//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer of the verification code
//! engine. It provides concrete implementations for the contracts defined in
//! `re_core`:
//!
//! - **Cache**: Redis client, Lua-scripted and in-process code stores
//! - **Services**: Redis and in-process sliding window limiters
//! - **SMS**: providers, rate limiting, failover and durable retry decorators
//! - **Database**: MySQL retry job store using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL retry job store (default)

// Re-export core types for convenience
pub use re_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// SMS module - providers and resilience decorators
pub mod sms;

/// Cache module - Redis client and code stores
pub mod cache;

/// Services module - rate limiter implementations
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use re_core::repositories::{CodeStore, InMemoryRetryStore, RetryStore};
use re_core::services::{CodeService, MessageGateway, SlidingWindowLimiter};
use re_shared::config::{AppConfig, CodeStoreBackend};

use crate::cache::{LocalCodeCache, RedisClient, RedisCodeCache};
use crate::services::{LocalSlidingWindowLimiter, RedisSlidingWindowLimiter};
use crate::sms::{build_gateway, RetryWorker, RetryWorkerHandle};

/// Code service over type-erased store and gateway
pub type DynCodeService = CodeService<dyn CodeStore, dyn MessageGateway>;

/// Wired infrastructure services
pub struct InfrastructureServices {
    /// Verification code service
    pub code_service: Arc<DynCodeService>,
    /// Composed delivery pipeline used by `code_service`
    pub gateway: Arc<dyn MessageGateway>,
    /// Background retry worker, when durable retry is enabled
    pub retry_worker: Option<Arc<RetryWorker>>,
    /// Store of throttled sends
    pub retry_store: Arc<dyn RetryStore>,
}

impl InfrastructureServices {
    /// Spawn the retry worker, if any, on the current runtime
    pub fn start_retry_worker(&self) -> Option<RetryWorkerHandle> {
        self.retry_worker.as_ref().map(|worker| worker.clone().start_background_task())
    }
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The code store and limiter for the configured backend
/// - The retry job store (MySQL with the Redis backend, memory otherwise)
/// - The SMS delivery pipeline and its retry worker
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        backend = ?config.code_store,
        "Initializing infrastructure services..."
    );

    let verification = &config.verification;
    let (store, limiter, retry_store): (
        Arc<dyn CodeStore>,
        Arc<dyn SlidingWindowLimiter>,
        Arc<dyn RetryStore>,
    ) = match config.code_store {
        CodeStoreBackend::Memory => (
            Arc::new(LocalCodeCache::new(verification.clone())),
            Arc::new(LocalSlidingWindowLimiter::new(
                verification.limiter_window(),
                verification.limiter_threshold,
            )),
            Arc::new(InMemoryRetryStore::new()),
        ),
        CodeStoreBackend::Redis => {
            let client = RedisClient::new(config.cache.clone()).await?;
            if !client.health_check().await? {
                return Err(InfrastructureError::Config(
                    "Redis did not answer PING".to_string(),
                ));
            }
            (
                Arc::new(RedisCodeCache::new(client.clone(), verification.clone())),
                Arc::new(RedisSlidingWindowLimiter::new(
                    client,
                    verification.limiter_window(),
                    verification.limiter_threshold,
                )),
                durable_retry_store(config).await?,
            )
        }
    };

    let built = build_gateway(&config.sms, limiter, retry_store.clone())?;
    let retry_worker = built.retry_inner.map(|inner| {
        Arc::new(RetryWorker::new(inner, retry_store.clone(), verification))
    });

    let code_service = Arc::new(CodeService::new(
        store,
        built.gateway.clone(),
        verification.clone(),
    ));

    tracing::info!(
        provider = built.gateway.provider_name(),
        retry_worker = retry_worker.is_some(),
        "Infrastructure services initialized successfully"
    );

    Ok(InfrastructureServices {
        code_service,
        gateway: built.gateway,
        retry_worker,
        retry_store,
    })
}

#[cfg(feature = "mysql")]
async fn durable_retry_store(config: &AppConfig) -> Result<Arc<dyn RetryStore>, InfrastructureError> {
    let pool = database::DatabasePool::new(config.database.clone()).await?;
    if !pool.health_check().await? {
        return Err(InfrastructureError::Config(
            "database did not answer SELECT 1".to_string(),
        ));
    }
    tracing::info!(
        max_connections = pool.config().max_connections,
        "Retry jobs are stored in MySQL"
    );
    let repository = database::MySqlRetryJobRepository::new(pool.get_pool().clone());
    repository.create_table_if_not_exists().await?;
    Ok(Arc::new(repository))
}

#[cfg(not(feature = "mysql"))]
async fn durable_retry_store(_config: &AppConfig) -> Result<Arc<dyn RetryStore>, InfrastructureError> {
    tracing::warn!("mysql feature disabled, retry jobs are kept in memory");
    Ok(Arc::new(InMemoryRetryStore::new()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation did not complete in time
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(err: config::ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
