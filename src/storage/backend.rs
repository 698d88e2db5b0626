//! Storage backend interface
//!
//! Both engines implement [`StorageBackend`] with identical semantics. An
//! "active" entry is the firing entry for a fingerprint; at most one exists
//! at a time.

use crate::config::StorageKind;
use crate::core::models::{AlertInfo, SendRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// True iff an active firing entry exists
    async fn exists(&self, fingerprint: &str) -> Result<bool>;

    /// Increment the active entry's count, creating it at 1 when absent.
    /// Atomic per fingerprint.
    async fn increment_count(&self, fingerprint: &str) -> Result<i64>;

    /// Set the start time of the active entry; no-op without one
    async fn set_start_time(&self, fingerprint: &str, start_time: &str) -> Result<()>;

    /// Write the populated fields of `info` onto the active entry; no-op without one
    async fn set_alert_info(&self, fingerprint: &str, info: &AlertInfo) -> Result<()>;

    /// Start time of the most recent entry, active or not
    async fn get_start_time(&self, fingerprint: &str) -> Result<Option<String>>;

    /// Metadata of the most recent entry
    async fn get_alert_info(&self, fingerprint: &str) -> Result<AlertInfo>;

    /// Count of the active entry
    async fn get_alert_count(&self, fingerprint: &str) -> Result<Option<i64>>;

    /// Resolve the active entry, stamping `ends_at` when given; no-op without one
    async fn delete(&self, fingerprint: &str, ends_at: Option<&str>) -> Result<()>;

    /// Expiry hint; engines without native expiry ignore it
    async fn expire(&self, fingerprint: &str, ttl_seconds: u64) -> Result<()>;

    /// Delete resolved entries resolved strictly before `cutoff`, or all of
    /// them when `cutoff` is `None`. Returns the number deleted.
    async fn delete_expired(&self, cutoff: Option<DateTime<Utc>>) -> Result<u64>;

    /// Attach a delivery outcome to the most relevant entry
    async fn record_send_history(&self, record: &SendRecord) -> Result<()>;

    /// Release connections; later calls fail with `Unavailable`
    async fn close(&self) -> Result<()>;

    /// Ping the engine
    async fn health_check(&self) -> Result<()>;

    fn kind(&self) -> StorageKind;
}
