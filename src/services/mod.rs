//! Services module
//!
//! Long-running background services

pub mod retention;

pub use retention::{RetentionSweeper, SweeperState};
