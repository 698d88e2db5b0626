//! Alert state models
//!
//! `AlertRecord` is the unit of persisted state for one alert episode. The
//! enums here are stored as lowercase text so both backends agree on the
//! representation.

use crate::utils::error::{RelayError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an alert entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Firing,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firing" => Ok(Self::Firing),
            "resolved" => Ok(Self::Resolved),
            other => Err(RelayError::validation(format!(
                "Unknown alert status: {}",
                other
            ))),
        }
    }
}

/// Chat platform a notification was delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "qywechat")]
    QyWechat,
    #[serde(rename = "feishu")]
    Feishu,
    #[serde(rename = "dingtalk")]
    DingTalk,
}

impl Platform {
    /// Every platform accepted by the `alerts.platform` column
    pub const ALL: [Platform; 3] = [Platform::QyWechat, Platform::Feishu, Platform::DingTalk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QyWechat => "qywechat",
            Self::Feishu => "feishu",
            Self::DingTalk => "dingtalk",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| RelayError::validation(format!("Unknown platform: {}", s)))
    }
}

/// Outcome of the last delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Success,
    Failed,
}

impl SendStatus {
    pub fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Failed }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for SendStatus {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(RelayError::validation(format!(
                "Unknown send status: {}",
                other
            ))),
        }
    }
}

/// Descriptive metadata captured when an episode starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub alertname: Option<String>,
    pub summary: Option<String>,
    pub instance: Option<String>,
    pub severity: Option<String>,
}

impl AlertInfo {
    /// Build from optional values, dropping empty strings
    pub fn new(
        alertname: Option<&str>,
        summary: Option<&str>,
        instance: Option<&str>,
        severity: Option<&str>,
    ) -> Self {
        Self {
            alertname: non_empty(alertname),
            summary: non_empty(summary),
            instance: non_empty(instance),
            severity: non_empty(severity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alertname.is_none()
            && self.summary.is_none()
            && self.instance.is_none()
            && self.severity.is_none()
    }

    /// Field name / value pairs for every populated field
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("alertname", self.alertname.as_deref()),
            ("summary", self.summary.as_deref()),
            ("instance", self.instance.as_deref()),
            ("severity", self.severity.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect()
    }
}

/// Keep a value only when it carries text
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One persisted alert entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Option<i64>,
    pub fingerprint: String,
    pub status: AlertStatus,
    pub count: i64,
    pub start_time: String,
    pub resolved_at: Option<DateTime<Utc>>,
    pub ends_at: Option<String>,
    pub info: AlertInfo,
    pub platform: Option<Platform>,
    pub send_status: Option<SendStatus>,
    pub send_error: Option<String>,
    pub webhook_url: Option<String>,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertRecord {
    pub fn is_firing(&self) -> bool {
        self.status == AlertStatus::Firing
    }
}

/// Delivery outcome reported back by the sending layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRecord {
    pub fingerprint: String,
    pub platform: Platform,
    pub alert_status: AlertStatus,
    pub send_success: bool,
    pub error_message: Option<String>,
    pub alert_count: Option<i64>,
    pub info: AlertInfo,
    pub webhook_url: Option<String>,
}

impl SendRecord {
    pub fn send_status(&self) -> SendStatus {
        SendStatus::from_success(self.send_success)
    }
}
