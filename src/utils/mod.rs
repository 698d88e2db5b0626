//! Utility modules for the relay
//!
//! - **error**: error type and helpers
//! - **logging**: tracing subscriber setup
//! - **shutdown**: SIGINT/SIGTERM cancellation token
//! - **time**: timezone parsing and display formatting

pub mod error;
pub mod logging;
pub mod shutdown;
pub mod time;
