//! Durable backend integration tests
//!
//! Exercises `create_backend` with on-disk SQLite and the backend contract
//! directly.

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use alertmanager_relay::config::{RelayConfig, StorageKind};
    use alertmanager_relay::core::models::{AlertInfo, AlertStatus, Platform, SendRecord};
    use alertmanager_relay::storage::database::DatabaseBackendType;
    use alertmanager_relay::{RelayError, StorageBackend, create_backend};

    fn file_config(dir: &tempfile::TempDir) -> RelayConfig {
        let path = dir.path().join("state").join("alerts.db");
        let mut config = RelayConfig::default();
        config.storage.kind = "sqlite".to_string();
        config.storage.database.url = format!("sqlite://{}?mode=rwc", path.display());
        config.lifecycle.display_timezone = "UTC".to_string();
        config
    }

    /// Episode state survives a process restart
    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);

        let backend = create_backend(&config).await.unwrap();
        assert_eq!(backend.kind(), StorageKind::Durable);
        assert_eq!(backend.increment_count("persist").await.unwrap(), 1);
        backend
            .set_start_time("persist", "2024-05-01 08:00:00")
            .await
            .unwrap();
        backend.close().await.unwrap();

        let reopened = create_backend(&config).await.unwrap();
        assert!(reopened.exists("persist").await.unwrap());
        assert_eq!(reopened.increment_count("persist").await.unwrap(), 2);
        assert_eq!(
            reopened.get_start_time("persist").await.unwrap().as_deref(),
            Some("2024-05-01 08:00:00")
        );
        reopened.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_backend_type_and_health() {
        let db = TestDatabase::new().await;
        assert_eq!(db.backend().backend_type(), DatabaseBackendType::SQLite);
        assert!(db.backend().health_check().await.is_ok());
        assert!(db.store().health_check().await);
    }

    /// Counts and metadata only describe the active episode
    #[tokio::test]
    async fn test_resolved_rows_are_not_active() {
        let db = TestDatabase::new().await;
        let backend = db.backend();

        backend.increment_count("R").await.unwrap();
        backend
            .set_alert_info(
                "R",
                &AlertInfo::new(Some("DiskFull"), Some("/var at 97%"), None, Some("warning")),
            )
            .await
            .unwrap();
        backend.delete("R", Some("2024-05-01 09:30:00")).await.unwrap();

        assert!(!backend.exists("R").await.unwrap());
        assert_eq!(backend.get_alert_count("R").await.unwrap(), None);

        // Resolved metadata is still readable for late resolution notices
        let info = backend.get_alert_info("R").await.unwrap();
        assert_eq!(info.alertname.as_deref(), Some("DiskFull"));
        assert_eq!(info.summary.as_deref(), Some("/var at 97%"));
    }

    /// A resolved-status delivery attaches to the newest row of any status
    #[tokio::test]
    async fn test_send_history_for_resolved_delivery() {
        let db = TestDatabase::new().await;
        let backend = db.backend();

        backend.increment_count("S").await.unwrap();
        backend.delete("S", None).await.unwrap();

        let record = SendRecord {
            fingerprint: "S".to_string(),
            platform: Platform::DingTalk,
            alert_status: AlertStatus::Resolved,
            send_success: true,
            error_message: None,
            alert_count: None,
            info: AlertInfo::default(),
            webhook_url: Some("https://oapi.dingtalk.com/robot/send".to_string()),
        };
        backend.record_send_history(&record).await.unwrap();

        let history = backend.history("S").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].platform, Some(Platform::DingTalk));
        assert_eq!(history[0].status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn test_operations_after_close_are_unavailable() {
        let db = TestDatabase::new().await;
        db.backend().close().await.unwrap();

        let err = db.backend().exists("X").await.unwrap_err();
        assert!(matches!(err, RelayError::Unavailable(_)), "got {:?}", err);
        assert!(err.is_backend_failure());
    }

    /// A database path under a regular file cannot be created
    #[tokio::test]
    async fn test_unusable_database_path_is_fatal() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let mut config = RelayConfig::default();
        config.storage.kind = "durable".to_string();
        config.storage.database.url = format!(
            "sqlite://{}?mode=rwc",
            blocker.path().join("alerts.db").display()
        );

        assert!(create_backend(&config).await.is_err());
    }
}
