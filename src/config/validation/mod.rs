//! Configuration validation
//!
//! - `trait_def`: core Validate trait definition
//! - `storage_validators`: storage backend validators
//! - `schedule_validators`: lifecycle, retention and logging validators
//! - `tests`: test suite for all validators

mod schedule_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
