//! Scheduled deletion of resolved alerts from durable storage
//!
//! The ephemeral backend expires keys natively and never needs this.

mod schedule;
mod sweeper;

pub use schedule::{next_run_after, retention_cutoff};
pub use sweeper::{RetentionSweeper, SweeperState};
