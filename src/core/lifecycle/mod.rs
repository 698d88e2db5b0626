//! Alert lifecycle tracking
//!
//! Decides for each incoming alert whether it opens an episode, repeats one,
//! or resolves one, and enriches it with stored state for rendering.

mod coordinator;
mod locks;
mod types;

pub use coordinator::LifecycleCoordinator;
pub use locks::{KeyedGuard, KeyedLocks};
pub use types::{DeliveryOutcome, EnrichedAlert, ProcessedNotification};
