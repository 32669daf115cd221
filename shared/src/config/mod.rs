//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `verification` - Code lifetime, anti-abuse limits and retry worker tuning
//! - `cache` - Redis connection used for codes and rate limiting
//! - `database` - MySQL pool for the retry job store
//! - `sms` - Providers, failover strategy and delivery decorators
//! - `environment` - Environment detection and logging configuration

pub mod cache;
pub mod database;
pub mod environment;
pub mod sms;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::{CacheConfig, CodeStoreBackend};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use sms::{FailoverStrategy, ProviderConfig, ProviderKind, SmsConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Backend holding verification codes
    #[serde(default)]
    pub code_store: CodeStoreBackend,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// SMS delivery configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            code_store: CodeStoreBackend::default(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::default(),
            sms: SmsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    ///
    /// Codes live in process memory so a local run needs no Redis.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            code_store: CodeStoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            code_store: CodeStoreBackend::Redis,
            cache: CacheConfig::new("redis://prod-cache:6379"),
            database: DatabaseConfig::new("mysql://prod-db:3306/webook").with_max_connections(50),
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Self::default()
        }
    }

    /// Environment preset selected by `ENVIRONMENT`, without file or variable overrides
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load the layered configuration
    ///
    /// Sources, later ones winning:
    /// 1. the preset for the detected environment
    /// 2. `config/{environment}.toml` when present
    /// 3. variables such as `APP__CACHE__URL` or `APP__VERIFICATION__COOLDOWN_SECS`
    ///
    /// A `.env` file is read first so its variables take part in steps 2 and 3.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::from_env();
        let file = defaults.environment.config_file().to_string();

        config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
