//! Core data models

pub mod alert;
pub mod notification;

pub use alert::{AlertInfo, AlertRecord, AlertStatus, Platform, SendRecord, SendStatus};
pub use notification::{AlertEvent, Notification};
