//! In-process sliding window rate limiter

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use re_core::errors::LimiterError;
use re_core::services::SlidingWindowLimiter;

/// Sliding window limiter keeping a timestamp log per key in memory
///
/// Same semantics as the Redis limiter for a single process.
pub struct LocalSlidingWindowLimiter {
    window: Duration,
    threshold: u64,
    logs: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl LocalSlidingWindowLimiter {
    pub fn new(window: Duration, threshold: u64) -> Self {
        Self {
            window,
            threshold,
            logs: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys currently holding admissions
    pub async fn tracked_keys(&self) -> usize {
        self.logs.lock().await.len()
    }
}

#[async_trait]
impl SlidingWindowLimiter for LocalSlidingWindowLimiter {
    async fn limit(&self, key: &str) -> Result<bool, LimiterError> {
        let now = Instant::now();
        let window = self.window;
        let mut logs = self.logs.lock().await;

        // Keys whose newest admission left the window hold no state worth keeping
        logs.retain(|_, log| log.back().is_some_and(|last| now.duration_since(*last) < window));

        let log = logs.entry(key.to_string()).or_default();
        while let Some(oldest) = log.front() {
            if now.duration_since(*oldest) >= window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() as u64 >= self.threshold {
            if log.is_empty() {
                logs.remove(key);
            }
            return Ok(true);
        }

        log.push_back(now);
        Ok(false)
    }
}
