use super::locks::KeyedLocks;
use super::types::{DeliveryOutcome, EnrichedAlert, ProcessedNotification};
use crate::config::LifecycleConfig;
use crate::core::models::{AlertEvent, AlertStatus, Notification, Platform, SendRecord};
use crate::storage::AlertStore;
use crate::utils::time::{format_in, now_in, parse_timezone_lenient};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

/// Drives alert state through storage for each incoming alert
#[derive(Debug)]
pub struct LifecycleCoordinator {
    store: AlertStore,
    alert_ttl_seconds: u64,
    display_tz: Tz,
    locks: KeyedLocks,
}

impl LifecycleCoordinator {
    pub fn new(store: AlertStore, config: &LifecycleConfig) -> Self {
        Self {
            store,
            alert_ttl_seconds: config.alert_ttl_seconds,
            display_tz: parse_timezone_lenient(&config.display_timezone),
            locks: KeyedLocks::new(),
        }
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn display_timezone(&self) -> Tz {
        self.display_tz
    }

    /// Enrich every alert of a notification, firing and resolved apart
    pub async fn process_notification(&self, notification: Notification) -> ProcessedNotification {
        let total = notification.alerts.len();
        if total > 1 {
            info!(
                "Received grouped notification: {} alerts, {} firing, {} resolved",
                total,
                notification.firing_count(),
                notification.resolved_count()
            );
        }

        let duplicates = notification.duplicate_fingerprints();
        if !duplicates.is_empty() {
            warn!(
                "Notification contains duplicate fingerprints {:?}; processing each occurrence",
                duplicates
            );
        }

        let mut processed = ProcessedNotification::default();
        for event in notification.alerts {
            match event.status {
                AlertStatus::Firing => processed.firing.push(self.process_firing(event).await),
                AlertStatus::Resolved => {
                    processed.resolved.push(self.process_resolved(event).await)
                }
            }
        }
        processed
    }

    /// Enrich a single alert according to its status
    pub async fn process_alert(&self, event: AlertEvent) -> EnrichedAlert {
        match event.status {
            AlertStatus::Firing => self.process_firing(event).await,
            AlertStatus::Resolved => self.process_resolved(event).await,
        }
    }

    async fn process_firing(&self, event: AlertEvent) -> EnrichedAlert {
        let event_start = event.starts_at.map(|t| format_in(t, self.display_tz));

        if !event.has_fingerprint() {
            debug!("Firing alert without fingerprint, skipping storage");
            return EnrichedAlert {
                count: 1,
                start_time: event_start.unwrap_or_else(|| now_in(self.display_tz)),
                end_time: None,
                event,
            };
        }

        let fingerprint = event.fingerprint.as_str();
        let _guard = self.locks.lock(fingerprint).await;

        let seen = self.store.exists(fingerprint).await;
        let count = self.store.increment_count(fingerprint).await;
        self.store.expire(fingerprint, self.alert_ttl_seconds).await;

        // A failed lookup reads as unseen; the counter must agree before an
        // episode's start time and metadata are written
        let is_new = !seen && count == 1;

        let start_time = if is_new {
            let start = event_start.unwrap_or_else(|| now_in(self.display_tz));
            self.store.set_start_time(fingerprint, &start).await;
            self.store
                .set_alert_info(fingerprint, &event.alert_info())
                .await;
            debug!("New alert episode {} starting {}", fingerprint, start);
            start
        } else {
            match event_start {
                Some(start) => start,
                None => self
                    .store
                    .get_start_time(fingerprint)
                    .await
                    .unwrap_or_else(|| now_in(self.display_tz)),
            }
        };

        EnrichedAlert {
            count,
            start_time,
            end_time: None,
            event,
        }
    }

    async fn process_resolved(&self, mut event: AlertEvent) -> EnrichedAlert {
        let event_start = event.starts_at.map(|t| format_in(t, self.display_tz));
        let end_time = event.ends_at.map(|t| format_in(t, self.display_tz));

        if !event.has_fingerprint() {
            debug!("Resolved alert without fingerprint, skipping storage");
            return EnrichedAlert {
                count: 1,
                start_time: event_start.unwrap_or_else(|| now_in(self.display_tz)),
                end_time,
                event,
            };
        }

        let fingerprint = event.fingerprint.clone();
        let _guard = self.locks.lock(&fingerprint).await;

        let start_time = match event_start {
            Some(start) => start,
            None => match self.store.get_start_time(&fingerprint).await {
                Some(stored) => stored,
                None => now_in(self.display_tz),
            },
        };

        let stored = self.store.get_alert_info(&fingerprint).await;
        if event.annotation("summary").is_none() {
            if let Some(summary) = stored.summary {
                event.annotations.insert("summary".to_string(), summary);
            }
        }
        if event.label("instance").is_none() {
            if let Some(instance) = stored.instance {
                event.labels.insert("instance".to_string(), instance);
            }
        }
        if event.label("alertname").is_none() {
            if let Some(alertname) = stored.alertname {
                event.labels.insert("alertname".to_string(), alertname);
            }
        }

        self.store.delete(&fingerprint, end_time.as_deref()).await;

        EnrichedAlert {
            count: 1,
            start_time,
            end_time,
            event,
        }
    }

    /// Record a delivery attempt against the alert's stored entry
    pub async fn record_delivery(
        &self,
        alert: &EnrichedAlert,
        platform: Platform,
        outcome: DeliveryOutcome,
    ) {
        if !alert.event.has_fingerprint() {
            return;
        }

        let record = SendRecord {
            fingerprint: alert.event.fingerprint.clone(),
            platform,
            alert_status: alert.event.status,
            send_success: outcome.success,
            error_message: outcome.error,
            alert_count: (alert.event.status == AlertStatus::Firing).then_some(alert.count),
            info: alert.event.alert_info(),
            webhook_url: outcome.webhook_url,
        };

        if !record.send_success {
            warn!(
                "Delivery of alert {} to {} failed: {}",
                record.fingerprint,
                platform,
                record.error_message.as_deref().unwrap_or("unknown error")
            );
        }

        self.store.record_send_history(&record).await;
    }
}
