//! Alertmanager payload fixtures

use alertmanager_relay::core::models::{AlertEvent, AlertStatus, Notification};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;

/// Fixed start instant used by every fixture: 2024-05-01 08:00:00 UTC
pub fn fixture_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

/// Fixed end instant used by resolved fixtures: 2024-05-01 09:30:00 UTC
pub fn fixture_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

pub struct AlertFactory;

impl AlertFactory {
    /// Firing alert with full labels and annotations
    pub fn firing(fingerprint: &str) -> AlertEvent {
        AlertEvent {
            status: AlertStatus::Firing,
            labels: HashMap::from([
                ("alertname".to_string(), "NodeDown".to_string()),
                ("instance".to_string(), "10.180.48.2:9100".to_string()),
                ("severity".to_string(), "critical".to_string()),
            ]),
            annotations: HashMap::from([(
                "summary".to_string(),
                "node exporter unreachable".to_string(),
            )]),
            starts_at: Some(fixture_start()),
            ends_at: None,
            fingerprint: fingerprint.to_string(),
            generator_url: "http://prometheus:9090/graph".to_string(),
        }
    }

    /// Resolved alert that carries only its fingerprint and end time
    pub fn bare_resolved(fingerprint: &str) -> AlertEvent {
        AlertEvent {
            status: AlertStatus::Resolved,
            labels: HashMap::new(),
            annotations: HashMap::new(),
            starts_at: None,
            ends_at: Some(fixture_end()),
            fingerprint: fingerprint.to_string(),
            generator_url: String::new(),
        }
    }
}

pub struct NotificationFactory;

impl NotificationFactory {
    /// Raw webhook JSON the way Alertmanager sends it
    pub fn json(alerts: serde_json::Value) -> String {
        json!({
            "version": "4",
            "groupKey": "{}:{alertname=\"NodeDown\"}",
            "status": "firing",
            "receiver": "qywechat",
            "groupLabels": {"alertname": "NodeDown"},
            "commonLabels": {},
            "commonAnnotations": {},
            "externalURL": "http://alertmanager:9093",
            "alerts": alerts,
        })
        .to_string()
    }

    pub fn parse(alerts: serde_json::Value) -> Notification {
        serde_json::from_str(&Self::json(alerts)).expect("fixture payload must parse")
    }

    pub fn from_events(alerts: Vec<AlertEvent>) -> Notification {
        Notification {
            version: "4".to_string(),
            receiver: "qywechat".to_string(),
            alerts,
            ..Notification::default()
        }
    }
}
