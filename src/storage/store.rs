//! Fail-open facade over a storage backend
//!
//! Alert delivery must never stall on storage. Every method here logs a
//! backend failure and returns a safe default instead of propagating it.

use super::backend::StorageBackend;
use crate::config::StorageKind;
use crate::core::models::{AlertInfo, SendRecord};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub struct AlertStore {
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for AlertStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertStore")
            .field("kind", &self.backend.kind())
            .finish()
    }
}

impl AlertStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub fn kind(&self) -> StorageKind {
        self.backend.kind()
    }

    pub async fn exists(&self, fingerprint: &str) -> bool {
        or_default("exists", fingerprint, self.backend.exists(fingerprint).await, false)
    }

    /// Falls back to 1 so a failing backend still renders a first occurrence
    pub async fn increment_count(&self, fingerprint: &str) -> i64 {
        or_default(
            "increment_count",
            fingerprint,
            self.backend.increment_count(fingerprint).await,
            1,
        )
    }

    pub async fn set_start_time(&self, fingerprint: &str, start_time: &str) {
        or_default(
            "set_start_time",
            fingerprint,
            self.backend.set_start_time(fingerprint, start_time).await,
            (),
        )
    }

    pub async fn set_alert_info(&self, fingerprint: &str, info: &AlertInfo) {
        if info.is_empty() {
            return;
        }
        or_default(
            "set_alert_info",
            fingerprint,
            self.backend.set_alert_info(fingerprint, info).await,
            (),
        )
    }

    pub async fn get_start_time(&self, fingerprint: &str) -> Option<String> {
        or_default(
            "get_start_time",
            fingerprint,
            self.backend.get_start_time(fingerprint).await,
            None,
        )
    }

    pub async fn get_alert_info(&self, fingerprint: &str) -> AlertInfo {
        or_default(
            "get_alert_info",
            fingerprint,
            self.backend.get_alert_info(fingerprint).await,
            AlertInfo::default(),
        )
    }

    pub async fn get_alert_count(&self, fingerprint: &str) -> Option<i64> {
        or_default(
            "get_alert_count",
            fingerprint,
            self.backend.get_alert_count(fingerprint).await,
            None,
        )
    }

    pub async fn delete(&self, fingerprint: &str, ends_at: Option<&str>) {
        or_default(
            "delete",
            fingerprint,
            self.backend.delete(fingerprint, ends_at).await,
            (),
        )
    }

    pub async fn expire(&self, fingerprint: &str, ttl_seconds: u64) {
        or_default(
            "expire",
            fingerprint,
            self.backend.expire(fingerprint, ttl_seconds).await,
            (),
        )
    }

    pub async fn delete_expired(&self, cutoff: Option<DateTime<Utc>>) -> u64 {
        or_default(
            "delete_expired",
            "*",
            self.backend.delete_expired(cutoff).await,
            0,
        )
    }

    pub async fn record_send_history(&self, record: &SendRecord) {
        or_default(
            "record_send_history",
            &record.fingerprint,
            self.backend.record_send_history(record).await,
            (),
        )
    }

    pub async fn health_check(&self) -> bool {
        match self.backend.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} storage health check failed: {}", self.kind(), e);
                false
            }
        }
    }

    pub async fn close(&self) -> Result<()> {
        self.backend.close().await
    }
}

fn or_default<T>(operation: &str, fingerprint: &str, result: Result<T>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.is_backend_failure() => {
            error!(
                operation,
                fingerprint, "Storage backend failure, continuing with default: {}", e
            );
            default
        }
        Err(e) => {
            warn!(
                operation,
                fingerprint, "Storage operation failed, continuing with default: {}", e
            );
            default
        }
    }
}
