//! # alertmanager-relay
//!
//! Core of an Alertmanager webhook relay: tracks the lifecycle of
//! deduplicated alerts so repeat notifications carry an occurrence count and
//! recovery notifications carry the data of the original firing event.
//!
//! ## Features
//!
//! - **Two storage backends**: Redis with per-alert TTL, or SQLite/PostgreSQL
//!   keeping the full alert history
//! - **Fail-open store**: storage outages degrade enrichment, never the relay
//! - **Per-fingerprint serialization**: concurrent events for one alert are
//!   applied one at a time
//! - **Scheduled retention**: resolved rows are purged daily in batches
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alertmanager_relay::{AlertStore, Config, LifecycleCoordinator, create_backend};
//! use alertmanager_relay::core::models::Notification;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/alertmanager-relay.yaml").await?;
//!     let backend = create_backend(&config.relay).await?;
//!     let coordinator =
//!         LifecycleCoordinator::new(AlertStore::new(backend), config.lifecycle());
//!
//!     let notification: Notification = serde_json::from_str(r#"{"alerts": []}"#)?;
//!     let processed = coordinator.process_notification(notification).await;
//!     println!("{} firing, {} resolved", processed.firing.len(), processed.resolved.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::lifecycle::{DeliveryOutcome, EnrichedAlert, LifecycleCoordinator};
pub use core::models::{AlertEvent, AlertStatus, Notification, Platform};
pub use services::RetentionSweeper;
pub use storage::{AlertStore, StorageBackend, create_backend};
pub use utils::error::{RelayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Relay build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
