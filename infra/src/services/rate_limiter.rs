//! Redis-based sliding window rate limiter

use async_trait::async_trait;
use chrono::Utc;
use redis::Script;
use std::time::Duration;
use uuid::Uuid;

use re_core::errors::LimiterError;
use re_core::services::SlidingWindowLimiter;

use crate::cache::redis_client::RedisClient;

/// Sliding window limiter over a Redis sorted set
///
/// Each admitted call is a member scored by its timestamp. Trimming the
/// window, counting and recording run in one Lua script.
pub struct RedisSlidingWindowLimiter {
    redis_client: RedisClient,
    window: Duration,
    threshold: u64,
    script: Script,
}

impl RedisSlidingWindowLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(redis_client: RedisClient, window: Duration, threshold: u64) -> Self {
        Self {
            redis_client,
            window,
            threshold,
            script: Script::new(include_str!("lua/sliding_window.lua")),
        }
    }
}

#[async_trait]
impl SlidingWindowLimiter for RedisSlidingWindowLimiter {
    async fn limit(&self, key: &str) -> Result<bool, LimiterError> {
        let key = self.redis_client.key(key);
        let args = [
            (self.window.as_millis() as u64).to_string(),
            self.threshold.to_string(),
            Utc::now().timestamp_millis().to_string(),
            // Unique member so same-millisecond calls are counted separately
            Uuid::new_v4().to_string(),
        ];

        let denied = self
            .redis_client
            .eval_i64(&self.script, &[&key], &args)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Rate limiter script failed");
                LimiterError::Unavailable {
                    message: e.to_string(),
                }
            })?;

        if denied == 1 {
            tracing::debug!(key = %key, threshold = self.threshold, "Rate limit reached");
        }
        Ok(denied == 1)
    }
}
