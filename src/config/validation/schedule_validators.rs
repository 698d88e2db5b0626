//! Lifecycle, retention and logging validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::utils::time::{parse_time_of_day, parse_timezone};

impl Validate for LifecycleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.alert_ttl_seconds == 0 {
            return Err("Alert TTL must be greater than 0".to_string());
        }

        parse_timezone(&self.display_timezone).map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl Validate for RetentionConfig {
    fn validate(&self) -> Result<(), String> {
        parse_time_of_day(&self.cleanup_time)
            .map_err(|_| format!("Cleanup time must be HH:MM, got '{}'", self.cleanup_time))?;

        parse_timezone(&self.timezone).map_err(|e| e.to_string())?;

        if self.error_backoff_seconds == 0 {
            return Err("Retention error backoff must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        tracing_subscriber::EnvFilter::try_new(self.level.trim())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))?;
        Ok(())
    }
}
