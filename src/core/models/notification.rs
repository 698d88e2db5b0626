//! Alertmanager webhook payload

use super::alert::{AlertInfo, AlertStatus};
use crate::utils::time::is_zero_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// One alert inside a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default, rename = "generatorURL")]
    pub generator_url: String,
}

impl AlertEvent {
    /// Non-empty label value
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Non-empty annotation value
    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Severity label, accepting the misspelled keys some rule files use
    pub fn severity(&self) -> Option<&str> {
        self.label("severity")
            .or_else(|| self.label("serverity"))
            .or_else(|| self.label("sereverity"))
    }

    /// Metadata worth remembering for the rest of the episode
    pub fn alert_info(&self) -> AlertInfo {
        AlertInfo::new(
            self.label("alertname"),
            self.annotation("summary"),
            self.label("instance"),
            self.severity(),
        )
    }

    pub fn has_fingerprint(&self) -> bool {
        !self.fingerprint.trim().is_empty()
    }
}

/// Alertmanager notification envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub group_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub group_labels: HashMap<String, String>,
    #[serde(default)]
    pub common_labels: HashMap<String, String>,
    #[serde(default)]
    pub common_annotations: HashMap<String, String>,
    #[serde(default, rename = "externalURL")]
    pub external_url: String,
    #[serde(default)]
    pub alerts: Vec<AlertEvent>,
}

impl Notification {
    pub fn firing_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Firing)
            .count()
    }

    pub fn resolved_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Resolved)
            .count()
    }

    /// Fingerprints that occur more than once in this batch
    pub fn duplicate_fingerprints(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for alert in self.alerts.iter().filter(|a| a.has_fingerprint()) {
            if !seen.insert(alert.fingerprint.as_str()) && !duplicates.contains(&alert.fingerprint)
            {
                duplicates.push(alert.fingerprint.clone());
            }
        }
        duplicates
    }
}

fn deserialize_optional_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let parsed = DateTime::parse_from_rfc3339(value)
                .map_err(serde::de::Error::custom)?
                .with_timezone(&Utc);
            Ok(if is_zero_time(&parsed) { None } else { Some(parsed) })
        }
    }
}
