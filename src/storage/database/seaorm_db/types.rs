use crate::utils::error::{RelayError, Result};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

/// Relational alert store.
///
/// The connection lives behind a single async mutex, so every operation is
/// serialized. `None` after `close`.
#[derive(Debug)]
pub struct DurableBackend {
    pub(super) db: Mutex<Option<DatabaseConnection>>,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
    /// Zone used to render the start time of rows created here
    pub(super) display_tz: Tz,
    pub(super) batch_size: u64,
    pub(super) batch_pause: Duration,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

impl DurableBackend {
    /// Hold the lock and borrow the open connection
    pub(crate) async fn lock(&self) -> Result<MappedMutexGuard<'_, DatabaseConnection>> {
        MutexGuard::try_map(self.db.lock().await, Option::as_mut)
            .map_err(|_| RelayError::unavailable("Database connection is closed"))
    }
}
