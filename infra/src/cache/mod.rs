//! Cache module for verification code storage
//!
//! This module provides the Redis client and the two `CodeStore`
//! implementations: Lua-scripted Redis for multi-instance deployments and an
//! in-process store for single-instance ones.

pub mod local_code_cache;
pub mod redis_client;
pub mod redis_code_cache;

#[cfg(test)]
mod tests;

pub use local_code_cache::LocalCodeCache;
pub use redis_client::RedisClient;
pub use redis_code_cache::RedisCodeCache;

// Re-export commonly used types
pub use re_shared::config::cache::CacheConfig;
