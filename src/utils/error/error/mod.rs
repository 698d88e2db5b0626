//! Error handling for the relay
//!
//! This module defines all error types used throughout the relay.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

// Re-export all public types
pub use types::{RelayError, Result};
