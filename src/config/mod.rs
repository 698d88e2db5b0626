//! Configuration management for the relay
//!
//! This module handles loading, validation, and management of all relay configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{RelayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the relay
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Relay configuration
    pub relay: RelayConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RelayError::Config(format!("Failed to read config file: {}", e)))?;

        let mut relay: RelayConfig = serde_yaml::from_str(&content)
            .map_err(|e| RelayError::Config(format!("Failed to parse config: {}", e)))?;
        relay.apply_env_overrides(|key| std::env::var(key).ok())?;

        let config = Self { relay };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let relay = RelayConfig::from_env()?;
        let config = Self { relay };

        config.validate()?;
        Ok(config)
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.relay.storage
    }

    /// Get lifecycle configuration
    pub fn lifecycle(&self) -> &LifecycleConfig {
        &self.relay.lifecycle
    }

    /// Get retention configuration
    pub fn retention(&self) -> &RetentionConfig {
        &self.relay.retention
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.relay.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.relay
            .storage
            .validate()
            .map_err(|e| RelayError::Config(format!("Storage config error: {}", e)))?;

        self.relay
            .lifecycle
            .validate()
            .map_err(|e| RelayError::Config(format!("Lifecycle config error: {}", e)))?;

        self.relay
            .retention
            .validate()
            .map_err(|e| RelayError::Config(format!("Retention config error: {}", e)))?;

        self.relay
            .logging
            .validate()
            .map_err(|e| RelayError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.relay = self.relay.merge(other.relay);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.relay)
            .map_err(|e| RelayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
