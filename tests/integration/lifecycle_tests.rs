//! Lifecycle coordination over durable storage
//!
//! Alertmanager payloads go in, enriched alerts and stored history come out.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{AlertFactory, NotificationFactory};
    use crate::common::TestDatabase;
    use alertmanager_relay::core::models::{AlertStatus, Platform, SendStatus};
    use alertmanager_relay::{DeliveryOutcome, StorageBackend};
    use serde_json::json;
    use std::sync::Arc;

    /// Firing three times, then resolving with a bare payload
    #[tokio::test]
    async fn test_full_episode_from_webhook_payloads() {
        let db = TestDatabase::new().await;
        let coordinator = db.coordinator();

        let firing = json!([{
            "status": "firing",
            "labels": {"alertname": "NodeDown", "instance": "10.180.48.2:9100", "serverity": "warning"},
            "annotations": {"summary": "node exporter unreachable"},
            "startsAt": "2024-05-01T16:00:00+08:00",
            "endsAt": "0001-01-01T00:00:00Z",
            "fingerprint": "3b1e6c2a9d0f4e77"
        }]);

        for expected in 1..=3 {
            let processed = coordinator
                .process_notification(NotificationFactory::parse(firing.clone()))
                .await;
            assert_eq!(processed.firing.len(), 1);
            assert!(processed.resolved.is_empty());
            assert_eq!(processed.firing[0].count, expected);
            assert_eq!(processed.firing[0].start_time, "2024-05-01 08:00:00");
        }

        let resolved = json!([{
            "status": "resolved",
            "labels": {},
            "annotations": {},
            "endsAt": "2024-05-01T09:30:00Z",
            "fingerprint": "3b1e6c2a9d0f4e77"
        }]);
        let processed = coordinator
            .process_notification(NotificationFactory::parse(resolved))
            .await;
        assert_eq!(processed.resolved.len(), 1);

        let alert = &processed.resolved[0];
        assert_eq!(alert.start_time, "2024-05-01 08:00:00");
        assert_eq!(alert.end_time.as_deref(), Some("2024-05-01 09:30:00"));
        assert_eq!(alert.event.label("alertname"), Some("NodeDown"));
        assert_eq!(alert.event.label("instance"), Some("10.180.48.2:9100"));
        assert_eq!(alert.event.annotation("summary"), Some("node exporter unreachable"));

        let history = db.backend().history("3b1e6c2a9d0f4e77").await.unwrap();
        assert_eq!(history.len(), 1);
        let row = &history[0];
        assert_eq!(row.status, AlertStatus::Resolved);
        assert_eq!(row.count, 3);
        assert_eq!(row.ends_at.as_deref(), Some("2024-05-01 09:30:00"));
        assert_eq!(row.info.severity.as_deref(), Some("warning"));
        assert!(row.resolved_at.is_some());
    }

    /// A recurrence after resolution opens a fresh episode
    #[tokio::test]
    async fn test_recurrence_starts_new_episode() {
        let db = TestDatabase::new().await;
        let coordinator = db.coordinator();

        coordinator.process_alert(AlertFactory::firing("F")).await;
        coordinator.process_alert(AlertFactory::firing("F")).await;
        coordinator.process_alert(AlertFactory::bare_resolved("F")).await;

        let again = coordinator.process_alert(AlertFactory::firing("F")).await;
        assert_eq!(again.count, 1);

        let history = db.backend().history("F").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, AlertStatus::Resolved);
        assert_eq!(history[0].count, 2);
        assert_eq!(history[1].status, AlertStatus::Firing);
        assert_eq!(history[1].count, 1);
    }

    /// Mixed batch keeps arrival order inside each status
    #[tokio::test]
    async fn test_grouped_notification_split() {
        let db = TestDatabase::new().await;
        let coordinator = db.coordinator();
        coordinator.process_alert(AlertFactory::firing("B")).await;

        let notification = NotificationFactory::from_events(vec![
            AlertFactory::firing("A"),
            AlertFactory::bare_resolved("B"),
            AlertFactory::firing("C"),
            AlertFactory::firing("A"),
        ]);
        let processed = coordinator.process_notification(notification).await;

        assert_eq!(processed.len(), 4);
        let firing: Vec<(&str, i64)> = processed
            .firing
            .iter()
            .map(|a| (a.fingerprint(), a.count))
            .collect();
        assert_eq!(firing, vec![("A", 1), ("C", 1), ("A", 2)]);
        assert_eq!(processed.resolved[0].fingerprint(), "B");
        assert_eq!(
            processed.resolved[0].event.label("alertname"),
            Some("NodeDown")
        );
    }

    /// Concurrent first sightings of one fingerprint yield distinct counts
    #[tokio::test]
    async fn test_concurrent_firing_is_serialized() {
        let db = TestDatabase::new().await;
        let coordinator = Arc::new(db.coordinator());

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    coordinator.process_alert(AlertFactory::firing("race")).await.count
                })
            })
            .collect();

        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }
        counts.sort_unstable();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);

        let history = db.backend().history("race").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].count, 5);
    }

    /// Delivery outcome lands on the active row
    #[tokio::test]
    async fn test_delivery_recorded_on_active_row() {
        let db = TestDatabase::new().await;
        let coordinator = db.coordinator();

        let alert = coordinator.process_alert(AlertFactory::firing("D")).await;
        coordinator
            .record_delivery(
                &alert,
                Platform::Feishu,
                DeliveryOutcome::failed("HTTP 502", Some("https://open.feishu.cn/hook/x".to_string())),
            )
            .await;

        let row = &db.backend().history("D").await.unwrap()[0];
        assert_eq!(row.platform, Some(Platform::Feishu));
        assert_eq!(row.send_status, Some(SendStatus::Failed));
        assert_eq!(row.send_error.as_deref(), Some("HTTP 502"));
        assert_eq!(row.webhook_url.as_deref(), Some("https://open.feishu.cn/hook/x"));
        assert!(row.last_sent_at.is_some());

        coordinator
            .record_delivery(&alert, Platform::Feishu, DeliveryOutcome::delivered(None))
            .await;
        let row = &db.backend().history("D").await.unwrap()[0];
        assert_eq!(row.send_status, Some(SendStatus::Success));
        assert!(row.send_error.is_none());
    }

    /// Storage outages degrade enrichment without failing the flow
    #[tokio::test]
    async fn test_closed_backend_fails_open() {
        let db = TestDatabase::new().await;
        let coordinator = db.coordinator();
        db.backend().close().await.unwrap();

        let firing = coordinator.process_alert(AlertFactory::firing("gone")).await;
        assert_eq!(firing.count, 1);
        assert_eq!(firing.start_time, "2024-05-01 08:00:00");

        let resolved = coordinator
            .process_alert(AlertFactory::bare_resolved("gone"))
            .await;
        assert_eq!(resolved.end_time.as_deref(), Some("2024-05-01 09:30:00"));
        assert!(resolved.event.label("alertname").is_none());
        assert!(!coordinator.store().health_check().await);
    }
}
