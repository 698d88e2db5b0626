use crate::core::models::{AlertInfo, AlertStatus};
use crate::utils::error::Result;
use crate::utils::time::format_in;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, alert};
use super::types::DurableBackend;

/// Newest firing row for `fingerprint`
pub(super) async fn find_active<C: ConnectionTrait>(
    conn: &C,
    fingerprint: &str,
) -> std::result::Result<Option<alert::Model>, DbErr> {
    entities::Alert::find()
        .filter(alert::Column::Fingerprint.eq(fingerprint))
        .filter(alert::Column::Status.eq(AlertStatus::Firing.as_str()))
        .order_by_desc(alert::Column::Id)
        .limit(1)
        .one(conn)
        .await
}

/// Newest row for `fingerprint`, whatever its status
pub(super) async fn find_latest<C: ConnectionTrait>(
    conn: &C,
    fingerprint: &str,
) -> std::result::Result<Option<alert::Model>, DbErr> {
    entities::Alert::find()
        .filter(alert::Column::Fingerprint.eq(fingerprint))
        .order_by_desc(alert::Column::Id)
        .limit(1)
        .one(conn)
        .await
}

impl DurableBackend {
    pub(super) async fn has_active(&self, fingerprint: &str) -> Result<bool> {
        let db = self.lock().await?;
        Ok(find_active(&*db, fingerprint).await?.is_some())
    }

    /// Increment the active row or open a new episode at 1
    pub(super) async fn bump_count(&self, fingerprint: &str) -> Result<i64> {
        let db = self.lock().await?;
        let txn = db.begin().await?;
        let now = Utc::now();

        let count = match find_active(&txn, fingerprint).await? {
            Some(row) => {
                let count = row.count + 1;
                let mut active: alert::ActiveModel = row.into();
                active.count = Set(count);
                active.updated_at = Set(now);
                active.update(&txn).await?;
                count
            }
            None => {
                let row = alert::ActiveModel {
                    fingerprint: Set(fingerprint.to_string()),
                    status: Set(AlertStatus::Firing.as_str().to_string()),
                    count: Set(1),
                    start_time: Set(format_in(now, self.display_tz)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                row.insert(&txn).await?;
                debug!("Opened new episode for alert {}", fingerprint);
                1
            }
        };

        txn.commit().await?;
        Ok(i64::from(count))
    }

    pub(super) async fn update_start_time(&self, fingerprint: &str, start_time: &str) -> Result<()> {
        let db = self.lock().await?;
        let txn = db.begin().await?;

        if let Some(row) = find_active(&txn, fingerprint).await? {
            let mut active: alert::ActiveModel = row.into();
            active.start_time = Set(start_time.to_string());
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Write only the populated fields of `info`
    pub(super) async fn update_alert_info(&self, fingerprint: &str, info: &AlertInfo) -> Result<()> {
        if info.is_empty() {
            return Ok(());
        }

        let db = self.lock().await?;
        let txn = db.begin().await?;

        if let Some(row) = find_active(&txn, fingerprint).await? {
            let mut active: alert::ActiveModel = row.into();
            if let Some(alertname) = &info.alertname {
                active.alertname = Set(Some(alertname.clone()));
            }
            if let Some(summary) = &info.summary {
                active.summary = Set(Some(summary.clone()));
            }
            if let Some(instance) = &info.instance {
                active.instance = Set(Some(instance.clone()));
            }
            if let Some(severity) = &info.severity {
                active.severity = Set(Some(severity.clone()));
            }
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub(super) async fn latest_start_time(&self, fingerprint: &str) -> Result<Option<String>> {
        let db = self.lock().await?;
        Ok(find_latest(&*db, fingerprint)
            .await?
            .map(|row| row.start_time))
    }

    pub(super) async fn latest_alert_info(&self, fingerprint: &str) -> Result<AlertInfo> {
        let db = self.lock().await?;
        Ok(find_latest(&*db, fingerprint)
            .await?
            .map(|row| row.alert_info())
            .unwrap_or_default())
    }

    pub(super) async fn active_count(&self, fingerprint: &str) -> Result<Option<i64>> {
        let db = self.lock().await?;
        Ok(find_active(&*db, fingerprint)
            .await?
            .map(|row| i64::from(row.count)))
    }

    /// Flip the active row to resolved
    pub(super) async fn resolve_active(&self, fingerprint: &str, ends_at: Option<&str>) -> Result<()> {
        let db = self.lock().await?;
        let txn = db.begin().await?;

        match find_active(&txn, fingerprint).await? {
            Some(row) => {
                let now = Utc::now();
                let mut active: alert::ActiveModel = row.into();
                active.status = Set(AlertStatus::Resolved.as_str().to_string());
                active.resolved_at = Set(Some(now));
                if let Some(ends_at) = ends_at.filter(|e| !e.is_empty()) {
                    active.ends_at = Set(Some(ends_at.to_string()));
                }
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
            None => debug!("No firing row for alert {}, nothing to resolve", fingerprint),
        }

        txn.commit().await?;
        Ok(())
    }

    /// Every row for `fingerprint`, oldest first
    pub async fn history(&self, fingerprint: &str) -> Result<Vec<crate::core::models::AlertRecord>> {
        let db = self.lock().await?;
        let rows = entities::Alert::find()
            .filter(alert::Column::Fingerprint.eq(fingerprint))
            .order_by_asc(alert::Column::Id)
            .all(&*db)
            .await?;
        Ok(rows.iter().map(alert::Model::to_domain_record).collect())
    }
}
