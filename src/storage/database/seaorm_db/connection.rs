use crate::config::DatabaseConfig;
use crate::utils::error::{RelayError, Result};
use crate::utils::time::{DEFAULT_TIMEZONE, parse_timezone_lenient};
use chrono_tz::Tz;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, DurableBackend};

const SQLITE_PRAGMAS: [&str; 3] = [
    "PRAGMA journal_mode = DELETE",
    "PRAGMA synchronous = NORMAL",
    "PRAGMA foreign_keys = ON",
];

impl DurableBackend {
    /// Connect, prepare the schema and return a ready backend
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = if config.is_sqlite() {
            DatabaseBackendType::SQLite
        } else {
            DatabaseBackendType::PostgreSQL
        };

        if let Some(path) = config.sqlite_path() {
            Self::ensure_parent_dir(path).await?;
        }

        let db = Self::connect(config, backend_type).await?;
        info!("Database connection established ({:?})", backend_type);

        if backend_type == DatabaseBackendType::SQLite {
            for pragma in SQLITE_PRAGMAS {
                db.execute_unprepared(pragma).await?;
            }
            debug!("SQLite pragmas applied");
        }

        let backend = Self {
            db: Mutex::new(Some(db)),
            backend_type,
            display_tz: parse_timezone_lenient(DEFAULT_TIMEZONE),
            batch_size: config.batch_size.max(1),
            batch_pause: Duration::from_millis(config.batch_pause_ms),
        };
        backend.migrate().await?;
        Ok(backend)
    }

    /// Render start times of newly created rows in `tz`
    pub fn with_display_timezone(mut self, tz: Tz) -> Self {
        self.display_tz = tz;
        self
    }

    async fn connect(
        config: &DatabaseConfig,
        backend_type: DatabaseBackendType,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        // Recycled SQLite connections would lose the pragmas (and an
        // in-memory database entirely)
        if backend_type == DatabaseBackendType::PostgreSQL {
            opt.idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        Database::connect(opt).await.map_err(RelayError::Database)
    }

    async fn ensure_parent_dir(path: &str) -> Result<()> {
        let Some(dir) = Path::new(path).parent() else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || tokio::fs::try_exists(dir).await? {
            return Ok(());
        }

        info!("Creating database directory: {}", dir.display());
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            RelayError::Internal(format!("Failed to create database directory: {}", e))
        })
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        let db = self.lock().await?;
        Migrator::up(&*db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            RelayError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Close the database connection
    pub async fn shutdown(&self) -> Result<()> {
        let db = self.db.lock().await.take();
        if let Some(db) = db {
            info!("Closing database connection");
            db.close().await.map_err(RelayError::Database)?;
        }
        Ok(())
    }

    /// Health check
    pub async fn ping(&self) -> Result<()> {
        debug!("Performing database health check");
        let db = self.lock().await?;
        db.ping().await.map_err(RelayError::Database)?;
        debug!("Database health check passed");
        Ok(())
    }
}
