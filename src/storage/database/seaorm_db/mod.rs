// Module declarations
mod alert_ops;
mod connection;
mod retention_ops;
mod send_history_ops;
mod storage_impl;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, DurableBackend};
