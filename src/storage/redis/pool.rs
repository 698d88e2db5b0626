//! Redis connection management
//!
//! A single `ConnectionManager` multiplexes all commands and reconnects on
//! its own. Every command is bounded by the configured operation timeout.

use crate::config::RedisConfig;
use crate::utils::error::{RelayError, Result};
use parking_lot::Mutex;
use redis::{Client, RedisResult, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

pub struct RedisPool {
    /// Connection manager (None once closed)
    connection_manager: Mutex<Option<ConnectionManager>>,
    operation_timeout: Duration,
    display_url: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("url", &self.display_url)
            .field("operation_timeout", &self.operation_timeout)
            .field("open", &self.connection_manager.lock().is_some())
            .finish()
    }
}

impl RedisPool {
    /// Connect to Redis within the configured connection timeout
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let url = config.connection_url().map_err(RelayError::Config)?;
        let display_url = Self::sanitize_url(&url);
        info!("Connecting to Redis at {}", display_url);

        let client = Client::open(url.as_str()).map_err(RelayError::Redis)?;

        let connect_timeout = Duration::from_secs(config.connection_timeout);
        let connection_manager =
            match tokio::time::timeout(connect_timeout, ConnectionManager::new(client)).await {
                Ok(result) => result.map_err(RelayError::Redis)?,
                Err(_) => {
                    return Err(RelayError::timeout(format!(
                        "Redis connection to {} timed out after {:?}",
                        display_url, connect_timeout
                    )));
                }
            };

        let pool = Self {
            connection_manager: Mutex::new(Some(connection_manager)),
            operation_timeout: Duration::from_secs(config.operation_timeout),
            display_url,
        };
        pool.health_check().await?;

        info!("Redis connection established");
        Ok(pool)
    }

    /// Handle on the shared connection
    pub fn connection(&self) -> Result<ConnectionManager> {
        self.connection_manager
            .lock()
            .clone()
            .ok_or_else(|| RelayError::unavailable("Redis connection is closed"))
    }

    /// Await a Redis command, bounded by the operation timeout
    pub async fn with_timeout<T, F>(&self, command: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(RelayError::Redis),
            Err(_) => Err(RelayError::timeout(format!(
                "Redis {} timed out after {:?}",
                command, self.operation_timeout
            ))),
        }
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing Redis health check");
        let mut conn = self.connection()?;
        let _: String = self
            .with_timeout("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;

        debug!("Redis health check passed");
        Ok(())
    }

    /// Drop the connection; later commands fail with `Unavailable`
    pub fn close(&self) {
        if self.connection_manager.lock().take().is_some() {
            info!("Redis connection closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.connection_manager.lock().is_none()
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
