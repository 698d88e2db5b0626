//! Lifecycle coordinator configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Expiry hint applied to ephemeral entries on every firing update
    #[serde(default = "default_alert_ttl")]
    pub alert_ttl_seconds: u64,
    /// IANA zone used to render start and end times
    #[serde(default = "default_timezone")]
    pub display_timezone: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            alert_ttl_seconds: default_alert_ttl(),
            display_timezone: default_timezone(),
        }
    }
}

impl LifecycleConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.alert_ttl_seconds != default_alert_ttl() {
            self.alert_ttl_seconds = other.alert_ttl_seconds;
        }
        if other.display_timezone != default_timezone() {
            self.display_timezone = other.display_timezone;
        }
        self
    }
}
