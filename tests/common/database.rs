//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite backend.

use alertmanager_relay::config::{DatabaseConfig, LifecycleConfig};
use alertmanager_relay::storage::database::DurableBackend;
use alertmanager_relay::{AlertStore, LifecycleCoordinator};
use std::sync::Arc;

/// Durable backend over a private in-memory database
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<DurableBackend>,
}

impl TestDatabase {
    /// Create a new in-memory backend with the schema applied
    pub async fn new() -> Self {
        Self::with_config(test_db_config()).await
    }

    pub async fn with_config(config: DatabaseConfig) -> Self {
        let backend = DurableBackend::new(&config)
            .await
            .expect("Failed to create in-memory test database")
            .with_display_timezone(chrono_tz::UTC);

        Self {
            inner: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &DurableBackend {
        &self.inner
    }

    pub fn backend_arc(&self) -> Arc<DurableBackend> {
        Arc::clone(&self.inner)
    }

    pub fn store(&self) -> AlertStore {
        AlertStore::new(self.backend_arc())
    }

    /// Coordinator rendering times in UTC
    pub fn coordinator(&self) -> LifecycleCoordinator {
        LifecycleCoordinator::new(self.store(), &test_lifecycle_config())
    }
}

/// In-memory SQLite with small batches so batching is observable
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
        batch_size: 2,
        batch_pause_ms: 1,
    }
}

pub fn test_lifecycle_config() -> LifecycleConfig {
    LifecycleConfig {
        display_timezone: "UTC".to_string(),
        ..LifecycleConfig::default()
    }
}
