//! Configuration data models
//!
//! This module defines all configuration structures used by the relay.

#![allow(missing_docs)]

pub mod lifecycle;
pub mod logging;
pub mod relay;
pub mod retention;
pub mod storage;

// Re-export all configuration types
pub use lifecycle::*;
pub use logging::*;
pub use relay::*;
pub use retention::*;
pub use storage::*;

/// Default SQLite location, created on first start
pub fn default_database_url() -> String {
    "sqlite://data/alerts.db?mode=rwc".to_string()
}

/// Default Redis URL
pub fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// One connection keeps the durable backend strictly serialized
pub fn default_max_connections() -> u32 {
    1
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default per-command timeout in seconds
pub fn default_operation_timeout() -> u64 {
    5
}

pub fn default_redis_key_prefix() -> String {
    "alertmanager:alert:".to_string()
}

/// Rows removed per retention batch
pub fn default_batch_size() -> u64 {
    1000
}

/// Pause between retention batches in milliseconds
pub fn default_batch_pause_ms() -> u64 {
    100
}

/// Seven days: abandoned alerts are reclaimed by Redis after this
pub fn default_alert_ttl() -> u64 {
    7 * 24 * 60 * 60
}

pub fn default_timezone() -> String {
    crate::utils::time::DEFAULT_TIMEZONE.to_string()
}

pub fn default_retention_days() -> u32 {
    30
}

pub fn default_cleanup_time() -> String {
    "05:00".to_string()
}

pub fn default_error_backoff() -> u64 {
    3600
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
