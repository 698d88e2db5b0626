//! Database storage implementation using SeaORM
//!
//! Durable alert history in the `alerts` table. One firing row per
//! fingerprint is active at a time; resolved rows are kept until the
//! retention sweeper removes them.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;


pub use seaorm_db::{DatabaseBackendType, DurableBackend};
