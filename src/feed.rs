//! Security alert feed for the notification screen.
//!
//! Received push notifications become [`Alert`]s classified by severity and
//! kind. The screen shows either every alert or only critical ones, newest
//! first, each with a relative "2m ago" label.
//!
//! Severity and kind come from the pushing server's custom payload:
//!
//! ```json
//! { "severity": "critical", "type": "security" }
//! ```
//!
//! Unknown or missing values fall back to `Info` / `Status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::notifications::NotificationEvent;

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Needs immediate attention (e.g. unauthorized access).
    Critical,
    /// Degraded but not urgent (e.g. low camera battery).
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Parse a payload value; anything unrecognised is `Info`.
    pub fn from_payload(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("critical") => Self::Critical,
            Some("warning") => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Accent color used for the alert's border and icon.
    pub fn accent_color(self) -> &'static str {
        match self {
            Self::Critical => "#DC2626",
            Self::Warning => "#F59E0B",
            Self::Info => "#10B981",
        }
    }
}

/// What part of the system an alert concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Intrusion, door or motion events.
    Security,
    /// Device health (batteries, connectivity).
    System,
    /// Routine status updates.
    Status,
}

impl AlertKind {
    /// Parse a payload value; anything unrecognised is `Status`.
    pub fn from_payload(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("security") => Self::Security,
            Some("system") => Self::System,
            _ => Self::Status,
        }
    }
}

/// A single entry in the alert feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Identifier of the notification this alert came from.
    pub id: String,
    /// Headline, e.g. "Critical Alert".
    pub title: String,
    /// Detail line, e.g. "Unauthorized access detected - Main Entrance".
    pub description: String,
    /// When the alert arrived.
    pub received_at: DateTime<Utc>,
    /// Urgency.
    pub severity: Severity,
    /// Concerned subsystem.
    pub kind: AlertKind,
}

impl Alert {
    /// Build an alert from a received notification.
    pub fn from_event(event: &NotificationEvent, received_at: DateTime<Utc>) -> Self {
        let field = |name: &str| event.data.get(name).and_then(serde_json::Value::as_str);
        Self {
            id: event.identifier.clone(),
            title: event
                .title
                .clone()
                .unwrap_or_else(|| "Notification".to_string()),
            description: event.body.clone().unwrap_or_default(),
            received_at,
            severity: Severity::from_payload(field("severity")),
            kind: AlertKind::from_payload(field("type")),
        }
    }
}

/// Which alerts the feed shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertFilter {
    /// Every alert ("All Alerts" tab).
    #[default]
    All,
    /// Critical alerts only ("Critical" tab).
    Critical,
}

impl AlertFilter {
    /// Whether `alert` passes this filter.
    pub fn matches(self, alert: &Alert) -> bool {
        match self {
            Self::All => true,
            Self::Critical => alert.severity == Severity::Critical,
        }
    }
}

/// Newest-first list of alerts.
#[derive(Debug, Default, Clone)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
}

impl AlertFeed {
    /// An empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alert at the top of the feed.
    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
    }

    /// Convert and add a received notification.
    ///
    /// Returns `false` if a notification with the same identifier is
    /// already in the feed.
    pub fn ingest(&mut self, event: &NotificationEvent, now: DateTime<Utc>) -> bool {
        if self.alerts.iter().any(|a| a.id == event.identifier) {
            return false;
        }
        self.push(Alert::from_event(event, now));
        true
    }

    /// Alerts passing `filter`, newest first.
    pub fn visible(&self, filter: AlertFilter) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| filter.matches(a)).collect()
    }

    /// Number of alerts held.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Short relative age label: "just now", "2m ago", "1h ago", "3d ago".
pub fn relative_label(received_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(received_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}
