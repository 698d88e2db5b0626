use crate::core::models::AlertStatus;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use sea_orm::*;
use tracing::{debug, info};

use super::super::entities::{self, alert};
use super::types::DurableBackend;

impl DurableBackend {
    /// Delete resolved rows in batches, releasing the lock between them
    pub(super) async fn purge_resolved(&self, cutoff: Option<DateTime<Utc>>) -> Result<u64> {
        let mut total = 0u64;

        loop {
            let deleted = self.purge_batch(cutoff).await?;
            total += deleted;

            if deleted < self.batch_size {
                break;
            }

            debug!("Deleted batch of {} resolved alerts, pausing", deleted);
            tokio::time::sleep(self.batch_pause).await;
        }

        if total > 0 {
            info!("Deleted {} resolved alerts", total);
        }
        Ok(total)
    }

    async fn purge_batch(&self, cutoff: Option<DateTime<Utc>>) -> Result<u64> {
        let db = self.lock().await?;
        let txn = db.begin().await?;

        let mut query = entities::Alert::find()
            .select_only()
            .column(alert::Column::Id)
            .filter(alert::Column::Status.eq(AlertStatus::Resolved.as_str()));
        if let Some(cutoff) = cutoff {
            query = query.filter(alert::Column::ResolvedAt.lt(cutoff));
        }

        let ids: Vec<i32> = query
            .order_by_asc(alert::Column::Id)
            .limit(self.batch_size)
            .into_tuple()
            .all(&txn)
            .await?;

        if ids.is_empty() {
            txn.commit().await?;
            return Ok(0);
        }

        let result = entities::Alert::delete_many()
            .filter(alert::Column::Id.is_in(ids))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected)
    }
}
