//! Retention sweeper configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Schedule for reclaiming resolved rows from durable storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Run the sweeper when durable storage is selected
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Resolved rows older than this are deleted; 0 deletes every resolved row
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Daily run time, `HH:MM`
    #[serde(default = "default_cleanup_time")]
    pub cleanup_time: String,
    /// IANA zone the run time is expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Wait after a failed run, in seconds
    #[serde(default = "default_error_backoff")]
    pub error_backoff_seconds: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: default_retention_days(),
            cleanup_time: default_cleanup_time(),
            timezone: default_timezone(),
            error_backoff_seconds: default_error_backoff(),
        }
    }
}

impl RetentionConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = other.enabled;
        }
        if other.retention_days != default_retention_days() {
            self.retention_days = other.retention_days;
        }
        if other.cleanup_time != default_cleanup_time() {
            self.cleanup_time = other.cleanup_time;
        }
        if other.timezone != default_timezone() {
            self.timezone = other.timezone;
        }
        if other.error_backoff_seconds != default_error_backoff() {
            self.error_backoff_seconds = other.error_backoff_seconds;
        }
        self
    }
}
