//! Redis-backed alert state

use super::pool::RedisPool;
use super::scripts::{HashUpdate, hash_update_if_exists};
use crate::config::{RedisConfig, StorageKind};
use crate::core::models::{AlertInfo, SendRecord};
use crate::storage::backend::StorageBackend;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use redis::{AsyncCommands, Script};
use tracing::{debug, info};

pub(super) const FIELD_COUNT: &str = "count";
pub(super) const FIELD_START_TIME: &str = "startTime";
pub(super) const INFO_FIELDS: [&str; 4] = ["alertname", "summary", "instance", "severity"];

/// Alert state held in Redis hashes
#[derive(Debug)]
pub struct RedisBackend {
    pool: RedisPool,
    key_prefix: String,
    update_script: Script,
    /// TTL applied together with every count increment
    default_ttl: Option<u64>,
}

impl RedisBackend {
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let pool = RedisPool::new(config).await?;
        Ok(Self::with_pool(pool, config.key_prefix.clone()))
    }

    pub fn with_pool(pool: RedisPool, key_prefix: String) -> Self {
        Self {
            pool,
            key_prefix,
            update_script: hash_update_if_exists(),
            default_ttl: None,
        }
    }

    /// Expire entries `ttl_seconds` after their last increment
    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> Self {
        self.default_ttl = Some(ttl_seconds);
        self
    }

    pub(super) fn key(&self, fingerprint: &str) -> String {
        alert_key(&self.key_prefix, fingerprint)
    }

    /// Apply `update` only when the hash exists. Returns whether it was written.
    async fn update_if_exists(&self, fingerprint: &str, update: &HashUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(false);
        }

        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        let mut invocation = self.update_script.prepare_invoke();
        invocation.key(&key);
        for arg in update.to_args() {
            invocation.arg(arg);
        }

        let written: i64 = self
            .pool
            .with_timeout("EVALSHA", invocation.invoke_async(&mut conn))
            .await?;
        Ok(written == 1)
    }
}

pub(super) fn alert_key(prefix: &str, fingerprint: &str) -> String {
    format!("{}{}", prefix, fingerprint)
}

pub(super) fn ttl_arg(ttl_seconds: u64) -> i64 {
    i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
}

/// HINCRBY and EXPIRE in one MULTI/EXEC so a new key never lacks a TTL
pub(super) fn increment_pipeline(key: &str, ttl_seconds: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .hincr(key, FIELD_COUNT, 1i64)
        .expire(key, ttl_arg(ttl_seconds))
        .ignore();
    pipe
}

/// Audit fields written after a delivery attempt
pub(super) fn send_history_update(record: &SendRecord, sent_at: DateTime<Utc>) -> HashUpdate {
    HashUpdate::default()
        .set("platform", record.platform.as_str())
        .set("send_status", record.send_status().as_str())
        .set_or_clear("send_error", record.error_message.as_deref())
        .set_or_clear("webhook_url", record.webhook_url.as_deref())
        .set(
            "last_sent_at",
            sent_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
}

pub(super) fn alert_info_update(info: &AlertInfo) -> HashUpdate {
    info.present_fields()
        .into_iter()
        .fold(HashUpdate::default(), |update, (field, value)| {
            update.set(field, value)
        })
}

#[async_trait]
impl StorageBackend for RedisBackend {
    async fn exists(&self, fingerprint: &str) -> Result<bool> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        self.pool.with_timeout("EXISTS", conn.exists(&key)).await
    }

    async fn increment_count(&self, fingerprint: &str) -> Result<i64> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        let count: i64 = match self.default_ttl {
            Some(ttl) => {
                let (count,): (i64,) = self
                    .pool
                    .with_timeout(
                        "HINCRBY+EXPIRE",
                        increment_pipeline(&key, ttl).query_async(&mut conn),
                    )
                    .await?;
                count
            }
            None => {
                self.pool
                    .with_timeout("HINCRBY", conn.hincr(&key, FIELD_COUNT, 1i64))
                    .await?
            }
        };
        debug!("Alert {} count is now {}", fingerprint, count);
        Ok(count)
    }

    async fn set_start_time(&self, fingerprint: &str, start_time: &str) -> Result<()> {
        let update = HashUpdate::default().set(FIELD_START_TIME, start_time);
        self.update_if_exists(fingerprint, &update).await?;
        Ok(())
    }

    async fn set_alert_info(&self, fingerprint: &str, info: &AlertInfo) -> Result<()> {
        self.update_if_exists(fingerprint, &alert_info_update(info))
            .await?;
        Ok(())
    }

    async fn get_start_time(&self, fingerprint: &str) -> Result<Option<String>> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        self.pool
            .with_timeout("HGET", conn.hget(&key, FIELD_START_TIME))
            .await
    }

    async fn get_alert_info(&self, fingerprint: &str) -> Result<AlertInfo> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        let values: Vec<Option<String>> = self
            .pool
            .with_timeout("HMGET", conn.hget(&key, &INFO_FIELDS[..]))
            .await?;

        let field = |i: usize| values.get(i).and_then(|v| v.as_deref());
        Ok(AlertInfo::new(field(0), field(1), field(2), field(3)))
    }

    async fn get_alert_count(&self, fingerprint: &str) -> Result<Option<i64>> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        self.pool
            .with_timeout("HGET", conn.hget(&key, FIELD_COUNT))
            .await
    }

    async fn delete(&self, fingerprint: &str, _ends_at: Option<&str>) -> Result<()> {
        let key = self.key(fingerprint);
        let mut conn = self.pool.connection()?;
        let removed: i64 = self.pool.with_timeout("DEL", conn.del(&key)).await?;
        debug!("Removed {} Redis key(s) for alert {}", removed, fingerprint);
        Ok(())
    }

    async fn expire(&self, fingerprint: &str, ttl_seconds: u64) -> Result<()> {
        let key = self.key(fingerprint);
        let ttl = ttl_arg(ttl_seconds);
        let mut conn = self.pool.connection()?;
        let _: bool = self
            .pool
            .with_timeout("EXPIRE", conn.expire(&key, ttl))
            .await?;
        Ok(())
    }

    async fn delete_expired(&self, _cutoff: Option<DateTime<Utc>>) -> Result<u64> {
        // Keys expire natively
        Ok(0)
    }

    async fn record_send_history(&self, record: &SendRecord) -> Result<()> {
        let update = send_history_update(record, Utc::now());
        let written = self
            .update_if_exists(&record.fingerprint, &update)
            .await?;
        if !written {
            debug!(
                "No Redis entry for alert {}, send history not recorded",
                record.fingerprint
            );
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        info!("Closing Redis storage backend");
        self.pool.close();
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.pool.health_check().await
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Ephemeral
    }
}
