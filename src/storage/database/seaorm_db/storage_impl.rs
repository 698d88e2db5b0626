use crate::config::StorageKind;
use crate::core::models::{AlertInfo, SendRecord};
use crate::storage::backend::StorageBackend;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::DurableBackend;

#[async_trait]
impl StorageBackend for DurableBackend {
    async fn exists(&self, fingerprint: &str) -> Result<bool> {
        self.has_active(fingerprint).await
    }

    async fn increment_count(&self, fingerprint: &str) -> Result<i64> {
        self.bump_count(fingerprint).await
    }

    async fn set_start_time(&self, fingerprint: &str, start_time: &str) -> Result<()> {
        self.update_start_time(fingerprint, start_time).await
    }

    async fn set_alert_info(&self, fingerprint: &str, info: &AlertInfo) -> Result<()> {
        self.update_alert_info(fingerprint, info).await
    }

    async fn get_start_time(&self, fingerprint: &str) -> Result<Option<String>> {
        self.latest_start_time(fingerprint).await
    }

    async fn get_alert_info(&self, fingerprint: &str) -> Result<AlertInfo> {
        self.latest_alert_info(fingerprint).await
    }

    async fn get_alert_count(&self, fingerprint: &str) -> Result<Option<i64>> {
        self.active_count(fingerprint).await
    }

    async fn delete(&self, fingerprint: &str, ends_at: Option<&str>) -> Result<()> {
        self.resolve_active(fingerprint, ends_at).await
    }

    async fn expire(&self, _fingerprint: &str, _ttl_seconds: u64) -> Result<()> {
        // Retention is handled by the sweeper
        Ok(())
    }

    async fn delete_expired(&self, cutoff: Option<DateTime<Utc>>) -> Result<u64> {
        self.purge_resolved(cutoff).await
    }

    async fn record_send_history(&self, record: &SendRecord) -> Result<()> {
        self.attach_send_history(record).await
    }

    async fn close(&self) -> Result<()> {
        self.shutdown().await
    }

    async fn health_check(&self) -> Result<()> {
        self.ping().await
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Durable
    }
}
