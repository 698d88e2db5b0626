//! Test doubles for the storage layer

use super::StorageBackend;
use crate::config::StorageKind;
use crate::core::models::{AlertInfo, SendRecord};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Backend whose every call fails like a lost connection
#[derive(Default)]
pub(crate) struct FailingBackend {
    calls: AtomicUsize,
}

impl FailingBackend {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RelayError::timeout("backend unreachable"))
    }
}

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn exists(&self, _: &str) -> Result<bool> {
        self.fail()
    }
    async fn increment_count(&self, _: &str) -> Result<i64> {
        self.fail()
    }
    async fn set_start_time(&self, _: &str, _: &str) -> Result<()> {
        self.fail()
    }
    async fn set_alert_info(&self, _: &str, _: &AlertInfo) -> Result<()> {
        self.fail()
    }
    async fn get_start_time(&self, _: &str) -> Result<Option<String>> {
        self.fail()
    }
    async fn get_alert_info(&self, _: &str) -> Result<AlertInfo> {
        self.fail()
    }
    async fn get_alert_count(&self, _: &str) -> Result<Option<i64>> {
        self.fail()
    }
    async fn delete(&self, _: &str, _: Option<&str>) -> Result<()> {
        self.fail()
    }
    async fn expire(&self, _: &str, _: u64) -> Result<()> {
        self.fail()
    }
    async fn delete_expired(&self, _: Option<DateTime<Utc>>) -> Result<u64> {
        self.fail()
    }
    async fn record_send_history(&self, _: &SendRecord) -> Result<()> {
        self.fail()
    }
    async fn close(&self) -> Result<()> {
        Ok(())
    }
    async fn health_check(&self) -> Result<()> {
        self.fail()
    }
    fn kind(&self) -> StorageKind {
        StorageKind::Ephemeral
    }
}


/// Delegates to a real backend except for `exists`, which always fails
pub(crate) struct BlindExistsBackend {
    inner: Arc<dyn StorageBackend>,
}

impl BlindExistsBackend {
    pub(crate) fn new(inner: Arc<dyn StorageBackend>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageBackend for BlindExistsBackend {
    async fn exists(&self, _: &str) -> Result<bool> {
        Err(RelayError::timeout("EXISTS timed out"))
    }
    async fn increment_count(&self, fingerprint: &str) -> Result<i64> {
        self.inner.increment_count(fingerprint).await
    }
    async fn set_start_time(&self, fingerprint: &str, start_time: &str) -> Result<()> {
        self.inner.set_start_time(fingerprint, start_time).await
    }
    async fn set_alert_info(&self, fingerprint: &str, info: &AlertInfo) -> Result<()> {
        self.inner.set_alert_info(fingerprint, info).await
    }
    async fn get_start_time(&self, fingerprint: &str) -> Result<Option<String>> {
        self.inner.get_start_time(fingerprint).await
    }
    async fn get_alert_info(&self, fingerprint: &str) -> Result<AlertInfo> {
        self.inner.get_alert_info(fingerprint).await
    }
    async fn get_alert_count(&self, fingerprint: &str) -> Result<Option<i64>> {
        self.inner.get_alert_count(fingerprint).await
    }
    async fn delete(&self, fingerprint: &str, ends_at: Option<&str>) -> Result<()> {
        self.inner.delete(fingerprint, ends_at).await
    }
    async fn expire(&self, fingerprint: &str, ttl_seconds: u64) -> Result<()> {
        self.inner.expire(fingerprint, ttl_seconds).await
    }
    async fn delete_expired(&self, cutoff: Option<DateTime<Utc>>) -> Result<u64> {
        self.inner.delete_expired(cutoff).await
    }
    async fn record_send_history(&self, record: &SendRecord) -> Result<()> {
        self.inner.record_send_history(record).await
    }
    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }
    fn kind(&self) -> StorageKind {
        self.inner.kind()
    }
}
