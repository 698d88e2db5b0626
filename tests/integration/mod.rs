//! Integration tests for alertmanager-relay
//!
//! These tests drive the public API against real storage.

pub mod durable_backend_tests;
pub mod ephemeral_backend_tests;
pub mod lifecycle_tests;
