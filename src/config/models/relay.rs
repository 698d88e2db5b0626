//! Top-level relay configuration

use super::*;
use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};

/// Main relay configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Lifecycle coordinator configuration
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Retention sweeper configuration
    #[serde(default)]
    pub retention: RetentionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "ALERT_RELAY_";

impl RelayConfig {
    /// Defaults overridden by `ALERT_RELAY_*` variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides read through `lookup`, keyed by the full variable name
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("STORAGE_KIND") {
            self.storage.kind = v;
        }
        if let Some(v) = get("DATABASE_URL") {
            self.storage.database.url = v;
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            self.storage.database.max_connections = parse_env("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = get("DATABASE_BATCH_SIZE") {
            self.storage.database.batch_size = parse_env("DATABASE_BATCH_SIZE", &v)?;
        }
        if let Some(v) = get("DATABASE_BATCH_PAUSE_MS") {
            self.storage.database.batch_pause_ms = parse_env("DATABASE_BATCH_PAUSE_MS", &v)?;
        }
        if let Some(v) = get("REDIS_URL") {
            self.storage.redis.url = v;
        }
        if let Some(v) = get("REDIS_USERNAME") {
            self.storage.redis.username = Some(v);
        }
        if let Some(v) = get("REDIS_PASSWORD") {
            self.storage.redis.password = Some(v);
        }
        if let Some(v) = get("REDIS_OPERATION_TIMEOUT") {
            self.storage.redis.operation_timeout = parse_env("REDIS_OPERATION_TIMEOUT", &v)?;
        }
        if let Some(v) = get("ALERT_TTL_SECONDS") {
            self.lifecycle.alert_ttl_seconds = parse_env("ALERT_TTL_SECONDS", &v)?;
        }
        if let Some(v) = get("DISPLAY_TIMEZONE") {
            self.lifecycle.display_timezone = v;
        }
        if let Some(v) = get("RETENTION_ENABLED") {
            self.retention.enabled = parse_env("RETENTION_ENABLED", &v)?;
        }
        if let Some(v) = get("RETENTION_DAYS") {
            self.retention.retention_days = parse_env("RETENTION_DAYS", &v)?;
        }
        if let Some(v) = get("CLEANUP_TIME") {
            self.retention.cleanup_time = v;
        }
        if let Some(v) = get("RETENTION_TIMEZONE") {
            self.retention.timezone = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = get("LOG_JSON") {
            self.logging.json = parse_env("LOG_JSON", &v)?;
        }

        Ok(())
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.storage = self.storage.merge(other.storage);
        self.lifecycle = self.lifecycle.merge(other.lifecycle);
        self.retention = self.retention.merge(other.retention);
        self.logging = self.logging.merge(other.logging);
        self
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        RelayError::Config(format!(
            "Invalid value for {}{}: {} ({})",
            ENV_PREFIX, name, value, e
        ))
    })
}
