//! Storage layer for the relay
//!
//! Alert state lives behind [`StorageBackend`]. Callers hold an
//! [`AlertStore`], which never surfaces backend failures.

mod backend;
/// Database storage module
pub mod database;
/// Redis storage module
pub mod redis;
mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use backend::StorageBackend;
pub use store::AlertStore;

use crate::config::{RelayConfig, StorageKind};
use crate::utils::error::Result;
use crate::utils::time::parse_timezone_lenient;
use std::sync::Arc;
use tracing::info;

/// Build the configured backend. Failure here is fatal for the process.
pub async fn create_backend(config: &RelayConfig) -> Result<Arc<dyn StorageBackend>> {
    let storage = &config.storage;
    let kind = storage.storage_kind();
    info!("Initializing {} storage backend", kind);

    let backend: Arc<dyn StorageBackend> = match kind {
        StorageKind::Ephemeral => Arc::new(
            redis::RedisBackend::new(&storage.redis)
                .await?
                .with_default_ttl(config.lifecycle.alert_ttl_seconds),
        ),
        StorageKind::Durable => {
            let display_tz = parse_timezone_lenient(&config.lifecycle.display_timezone);
            Arc::new(
                database::DurableBackend::new(&storage.database)
                    .await?
                    .with_display_timezone(display_tz),
            )
        }
    };

    info!("{} storage backend ready", kind);
    Ok(backend)
}
