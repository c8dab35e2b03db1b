use crate::components::connected_accounts::ConnectionRequest;
use crate::config::MAX_WINDOW_DAYS;
use crate::utils::time::{iso_date, parse_instant};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Calendar event exactly as the upstream API returned it.
///
/// The shape is not guaranteed, so every accessor returns an `Option` and
/// missing or mistyped fields simply read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(pub Value);

impl RawEvent {
    /// Event title (`summary`)
    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn location(&self) -> Option<&str> {
        self.str_field("location")
    }

    /// Raw start value, `start.dateTime` preferred over `start.date`
    pub fn start_value(&self) -> Option<&str> {
        let start = self.0.get("start")?;
        start
            .get("dateTime")
            .and_then(|dt| dt.as_str())
            .filter(|dt| !dt.is_empty())
            .or_else(|| {
                start
                    .get("date")
                    .and_then(|d| d.as_str())
                    .filter(|d| !d.is_empty())
            })
    }

    /// Start instant of the event, `None` when missing or unparsable
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_value().and_then(parse_instant)
    }

    /// `start.dateTime` alone; all-day events have none
    pub fn start_date_time(&self) -> Option<&str> {
        self.nested_str("start", "dateTime")
    }

    /// `end.dateTime`
    pub fn end_date_time(&self) -> Option<&str> {
        self.nested_str("end", "dateTime")
    }

    /// `YYYY-MM-DD` of the start.
    ///
    /// Day-only values are returned as written so all-day events keep their
    /// calendar day whatever the server time zone; timed events use the UTC
    /// date of their start instant.
    pub fn start_date(&self) -> Option<String> {
        let value = self.start_value()?;
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(day) => Some(day.format("%Y-%m-%d").to_string()),
            Err(_) => parse_instant(value).map(|start| iso_date(&start)),
        }
    }

    /// Attendee names: `displayName` when present, otherwise `email`
    pub fn attendee_names(&self) -> Vec<&str> {
        self.0
            .get("attendees")
            .and_then(|a| a.as_array())
            .map(|attendees| {
                attendees
                    .iter()
                    .filter_map(|attendee| {
                        let display_name = attendee
                            .get("displayName")
                            .and_then(|n| n.as_str())
                            .filter(|n| !n.is_empty());
                        display_name.or_else(|| {
                            attendee
                                .get("email")
                                .and_then(|e| e.as_str())
                                .filter(|e| !e.is_empty())
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn nested_str(&self, outer: &str, key: &str) -> Option<&str> {
        self.0
            .get(outer)?
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        RawEvent(value)
    }
}

/// Whether a user has an active calendar connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

/// Result of asking to link a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOutcome {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_request_id: Option<String>,
}

impl ConnectOutcome {
    /// The user already has an active connection
    pub fn already_connected(connection_id: String) -> Self {
        Self {
            connected: true,
            already_connected: Some(true),
            connection_id: Some(connection_id),
            redirect_url: None,
            connection_request_id: None,
        }
    }

    /// A new connection was initiated and must be completed by the user
    pub fn pending(request: ConnectionRequest) -> Self {
        Self {
            connected: false,
            already_connected: None,
            connection_id: None,
            redirect_url: request.redirect_url,
            connection_request_id: Some(request.id),
        }
    }
}

/// Time range passed to the upstream event listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

impl FetchWindow {
    /// `days` before and after `now`
    pub fn around(now: DateTime<Utc>, days: i64) -> Self {
        let days = window_days(days);
        Self {
            time_min: now - Duration::days(days),
            time_max: now + Duration::days(days),
        }
    }

    /// Reaches back `lookback_days` (never less than `ahead_days`) and ahead `ahead_days`
    pub fn lookback(now: DateTime<Utc>, lookback_days: i64, ahead_days: i64) -> Self {
        let ahead_days = window_days(ahead_days);
        Self {
            time_min: now - Duration::days(window_days(lookback_days).max(ahead_days)),
            time_max: now + Duration::days(ahead_days),
        }
    }
}

/// Day counts outside `0..=MAX_WINDOW_DAYS` are clamped into it
fn window_days(days: i64) -> i64 {
    days.clamp(0, MAX_WINDOW_DAYS)
}
