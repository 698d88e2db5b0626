use crate::core::models::{AlertStatus, SendRecord};
use crate::utils::error::Result;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::alert;
use super::alert_ops::{find_active, find_latest};
use super::types::DurableBackend;

impl DurableBackend {
    /// Store the delivery outcome on the active row for firing deliveries,
    /// or on the newest row otherwise
    pub(super) async fn attach_send_history(&self, record: &SendRecord) -> Result<()> {
        let db = self.lock().await?;
        let txn = db.begin().await?;

        let target = match record.alert_status {
            AlertStatus::Firing => find_active(&txn, &record.fingerprint).await?,
            AlertStatus::Resolved => find_latest(&txn, &record.fingerprint).await?,
        };

        let Some(row) = target else {
            debug!(
                "No row for alert {}, send history not recorded",
                record.fingerprint
            );
            return Ok(());
        };

        let now = Utc::now();
        let mut active: alert::ActiveModel = row.into();
        active.platform = Set(Some(record.platform.as_str().to_string()));
        active.send_status = Set(Some(record.send_status().as_str().to_string()));
        active.send_error = Set(record.error_message.clone());
        active.webhook_url = Set(record.webhook_url.clone());
        active.last_sent_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
