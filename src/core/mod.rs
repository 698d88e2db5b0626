//! Core functionality for the relay
//!
//! This module contains the alert models and the lifecycle coordinator.

pub mod lifecycle;
pub mod models;
