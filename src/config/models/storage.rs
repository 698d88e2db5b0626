//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Which backend holds alert state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Redis hashes with native expiry
    Ephemeral,
    /// Relational table with scheduled retention
    Durable,
}

impl StorageKind {
    /// Resolve a configured selector. Unknown values fall back to the durable backend.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ephemeral" | "redis" => Self::Ephemeral,
            "durable" | "sqlite" | "database" | "postgres" | "postgresql" => Self::Durable,
            other => {
                warn!(
                    "Unknown storage kind '{}', falling back to durable storage",
                    other
                );
                Self::Durable
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ephemeral => "ephemeral",
            Self::Durable => "durable",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selector: `ephemeral`/`redis` or `durable`/`sqlite`
    #[serde(default = "default_storage_kind")]
    pub kind: String,
    /// Relational backend configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Redis backend configuration
    #[serde(default)]
    pub redis: RedisConfig,
}

fn default_storage_kind() -> String {
    StorageKind::Durable.as_str().to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: default_storage_kind(),
            database: DatabaseConfig::default(),
            redis: RedisConfig::default(),
        }
    }
}

impl StorageConfig {
    pub fn storage_kind(&self) -> StorageKind {
        StorageKind::from_config(&self.kind)
    }

    /// Merge storage configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        if other.kind != default_storage_kind() {
            self.kind = other.kind;
        }
        self.database = self.database.merge(other.database);
        self.redis = self.redis.merge(other.redis);
        self
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL (`sqlite://...` or `postgres://...`)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Rows deleted per retention batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Pause between retention batches in milliseconds
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != default_database_url() {
            self.url = other.url;
        }
        if other.max_connections != default_max_connections() {
            self.max_connections = other.max_connections;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        if other.batch_size != default_batch_size() {
            self.batch_size = other.batch_size;
        }
        if other.batch_pause_ms != default_batch_pause_ms() {
            self.batch_pause_ms = other.batch_pause_ms;
        }
        self
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }

    /// Filesystem path of a file-backed SQLite URL
    pub fn sqlite_path(&self) -> Option<&str> {
        let rest = self.url.strip_prefix("sqlite:")?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(path)
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// ACL username, merged into the URL when set
    #[serde(default)]
    pub username: Option<String>,
    /// Password, merged into the URL when set
    #[serde(default)]
    pub password: Option<String>,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Per-command timeout in seconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout: u64,
    /// Prefix for alert hash keys
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            username: None,
            password: None,
            connection_timeout: default_connection_timeout(),
            operation_timeout: default_operation_timeout(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

impl RedisConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != default_redis_url() {
            self.url = other.url;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        if other.operation_timeout != default_operation_timeout() {
            self.operation_timeout = other.operation_timeout;
        }
        if other.key_prefix != default_redis_key_prefix() {
            self.key_prefix = other.key_prefix;
        }
        self
    }

    /// URL with the configured credentials applied
    pub fn connection_url(&self) -> Result<String, String> {
        let mut parsed =
            url::Url::parse(&self.url).map_err(|e| format!("Invalid Redis URL: {}", e))?;

        if let Some(username) = self.username.as_deref().map(str::trim).filter(|u| !u.is_empty())
        {
            parsed
                .set_username(username)
                .map_err(|_| "Redis URL cannot carry a username".to_string())?;
        }
        if let Some(password) = self.password.as_deref().map(str::trim).filter(|p| !p.is_empty())
        {
            parsed
                .set_password(Some(password))
                .map_err(|_| "Redis URL cannot carry a password".to_string())?;
        }

        Ok(parsed.to_string())
    }
}
