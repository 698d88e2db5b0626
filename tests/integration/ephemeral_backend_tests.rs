//! Redis backend tests
//!
//! Require a running server:
//! `REDIS_URL=redis://127.0.0.1:6379 cargo test --test lib -- --ignored`

#[cfg(test)]
mod tests {
    use crate::common::database::test_lifecycle_config;
    use crate::common::fixtures::AlertFactory;
    use alertmanager_relay::config::{RedisConfig, StorageKind};
    use alertmanager_relay::core::models::{AlertInfo, AlertStatus, Platform, SendRecord};
    use alertmanager_relay::storage::redis::RedisBackend;
    use alertmanager_relay::{AlertStore, LifecycleCoordinator, RelayError, StorageBackend};
    use std::sync::Arc;

    async fn backend(test: &str) -> RedisBackend {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL").unwrap_or_default(),
            key_prefix: format!("relay-test:{}:{}:", test, std::process::id()),
            ..RedisConfig::default()
        };
        RedisBackend::new(&config)
            .await
            .expect("Failed to connect to Redis")
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_episode_lifecycle() {
        crate::skip_without_env!("REDIS_URL");
        let backend = backend("episode").await;
        assert_eq!(backend.kind(), StorageKind::Ephemeral);
        assert!(backend.health_check().await.is_ok());

        assert!(!backend.exists("fp").await.unwrap());
        assert_eq!(backend.increment_count("fp").await.unwrap(), 1);
        assert_eq!(backend.increment_count("fp").await.unwrap(), 2);
        backend.expire("fp", 60).await.unwrap();
        backend
            .set_start_time("fp", "2024-05-01 16:00:00")
            .await
            .unwrap();
        backend
            .set_alert_info(
                "fp",
                &AlertInfo::new(Some("NodeDown"), Some("unreachable"), None, Some("critical")),
            )
            .await
            .unwrap();

        assert!(backend.exists("fp").await.unwrap());
        assert_eq!(backend.get_alert_count("fp").await.unwrap(), Some(2));
        assert_eq!(
            backend.get_start_time("fp").await.unwrap().as_deref(),
            Some("2024-05-01 16:00:00")
        );
        let info = backend.get_alert_info("fp").await.unwrap();
        assert_eq!(info.alertname.as_deref(), Some("NodeDown"));
        assert!(info.instance.is_none());

        let record = SendRecord {
            fingerprint: "fp".to_string(),
            platform: Platform::QyWechat,
            alert_status: AlertStatus::Firing,
            send_success: true,
            error_message: None,
            alert_count: Some(2),
            info: AlertInfo::default(),
            webhook_url: None,
        };
        backend.record_send_history(&record).await.unwrap();

        backend.delete("fp", None).await.unwrap();
        assert!(!backend.exists("fp").await.unwrap());
        assert_eq!(backend.get_alert_count("fp").await.unwrap(), None);
        assert_eq!(backend.delete_expired(None).await.unwrap(), 0);

        // Writes against a deleted key must not recreate it
        backend.record_send_history(&record).await.unwrap();
        assert!(!backend.exists("fp").await.unwrap());

        backend.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_coordinator_flow() {
        crate::skip_without_env!("REDIS_URL");
        let backend = Arc::new(backend("flow").await);
        let coordinator = LifecycleCoordinator::new(
            AlertStore::new(backend.clone()),
            &test_lifecycle_config(),
        );

        assert_eq!(coordinator.process_alert(AlertFactory::firing("F")).await.count, 1);
        assert_eq!(coordinator.process_alert(AlertFactory::firing("F")).await.count, 2);

        let resolved = coordinator
            .process_alert(AlertFactory::bare_resolved("F"))
            .await;
        assert_eq!(resolved.start_time, "2024-05-01 08:00:00");
        assert_eq!(resolved.event.label("alertname"), Some("NodeDown"));
        assert!(!backend.exists("F").await.unwrap());

        backend.close().await.unwrap();
    }

    /// A fresh entry carries its TTL from the very first increment
    #[tokio::test]
    #[ignore]
    async fn test_redis_increment_sets_ttl() {
        crate::skip_without_env!("REDIS_URL");
        let url = std::env::var("REDIS_URL").unwrap();
        let prefix = format!("relay-test:ttl:{}:", std::process::id());
        let config = RedisConfig {
            url: url.clone(),
            key_prefix: prefix.clone(),
            ..RedisConfig::default()
        };
        let backend = RedisBackend::new(&config).await.unwrap().with_default_ttl(300);

        assert_eq!(backend.increment_count("fp").await.unwrap(), 1);

        let client = redis::Client::open(url.as_str()).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let ttl: i64 = redis::cmd("TTL")
            .arg(format!("{}fp", prefix))
            .query_async(&mut conn)
            .await
            .unwrap();
        assert!(ttl > 0 && ttl <= 300, "ttl was {}", ttl);

        backend.delete("fp", None).await.unwrap();
        backend.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_closed_pool_is_unavailable() {
        crate::skip_without_env!("REDIS_URL");
        let backend = backend("closed").await;
        backend.close().await.unwrap();

        let err = backend.exists("fp").await.unwrap_err();
        assert!(matches!(err, RelayError::Unavailable(_)), "got {:?}", err);
    }
}
