use crate::core::models::{AlertInfo, AlertRecord, AlertStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One alert episode, firing or resolved
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Dedup key; repeated across episodes
    pub fingerprint: String,

    /// `firing` or `resolved`
    pub status: String,

    pub count: i32,

    /// First-seen time in display format
    pub start_time: String,

    pub resolved_at: Option<DateTimeUtc>,

    /// End time as reported by the resolving notification
    pub ends_at: Option<String>,

    pub alertname: Option<String>,
    pub summary: Option<String>,
    pub instance: Option<String>,
    pub severity: Option<String>,

    // Delivery audit
    pub platform: Option<String>,
    pub send_status: Option<String>,
    pub send_error: Option<String>,
    pub last_sent_at: Option<DateTimeUtc>,
    pub webhook_url: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn alert_info(&self) -> AlertInfo {
        AlertInfo::new(
            self.alertname.as_deref(),
            self.summary.as_deref(),
            self.instance.as_deref(),
            self.severity.as_deref(),
        )
    }

    /// Convert to domain record
    pub fn to_domain_record(&self) -> AlertRecord {
        AlertRecord {
            id: Some(i64::from(self.id)),
            fingerprint: self.fingerprint.clone(),
            status: self.status.parse().unwrap_or(AlertStatus::Firing),
            count: i64::from(self.count),
            start_time: self.start_time.clone(),
            resolved_at: self.resolved_at,
            ends_at: self.ends_at.clone(),
            info: self.alert_info(),
            platform: self.platform.as_deref().and_then(|p| p.parse().ok()),
            send_status: self.send_status.as_deref().and_then(|s| s.parse().ok()),
            send_error: self.send_error.clone(),
            webhook_url: self.webhook_url.clone(),
            last_sent_at: self.last_sent_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
