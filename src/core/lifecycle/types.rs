use crate::core::models::AlertEvent;

/// An alert together with the state recovered from storage
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedAlert {
    /// The incoming event, with missing labels and annotations backfilled
    pub event: AlertEvent,
    /// Firing notifications seen in this episode
    pub count: i64,
    /// First-seen time in display format
    pub start_time: String,
    /// End time in display format, resolved alerts only
    pub end_time: Option<String>,
}

impl EnrichedAlert {
    pub fn fingerprint(&self) -> &str {
        &self.event.fingerprint
    }
}

/// A notification split by status, in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedNotification {
    pub firing: Vec<EnrichedAlert>,
    pub resolved: Vec<EnrichedAlert>,
}

impl ProcessedNotification {
    pub fn len(&self) -> usize {
        self.firing.len() + self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firing.is_empty() && self.resolved.is_empty()
    }
}

/// Result of one delivery attempt, reported by the sending layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub webhook_url: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(webhook_url: Option<String>) -> Self {
        Self {
            success: true,
            error: None,
            webhook_url,
        }
    }

    pub fn failed(error: impl Into<String>, webhook_url: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            webhook_url,
        }
    }
}
