use super::envelope::extract_event_array;
use super::models::RawEvent;
use crate::utils::time::{iso_millis, parse_instant};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Reverse;

/// Events kept per bucket
pub const BUCKET_SIZE: usize = 5;

/// Title used when a timed event has none
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Timed event as shown in the upcoming and past lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub end_time: DateTime<Utc>,
    /// Length in whole minutes, rounded
    pub duration: i64,
    pub attendees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
}

impl CalendarEvent {
    /// `None` for all-day events and events whose `start.dateTime` does not parse.
    /// A missing or unreadable end makes a zero-length event.
    pub fn from_event(event: &RawEvent) -> Option<Self> {
        let start_time = event.start_date_time().and_then(parse_instant)?;
        let end_time = event
            .end_date_time()
            .and_then(parse_instant)
            .unwrap_or(start_time);
        let duration = ((end_time - start_time).num_milliseconds() as f64 / 60_000.0).round() as i64;

        Some(Self {
            id: event
                .0
                .get("id")
                .and_then(|id| id.as_str())
                .unwrap_or_default()
                .to_string(),
            title: event.summary().unwrap_or(UNTITLED_EVENT).to_string(),
            start_time,
            end_time,
            duration,
            attendees: contact_list(&event.0),
            description: event.description().map(str::to_string),
            location: event.location().map(str::to_string),
            organizer: event
                .0
                .get("organizer")
                .and_then(|o| o.get("email"))
                .and_then(|e| e.as_str())
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        })
    }
}

/// Attendees by email first, then display name, else `"Unknown"`
fn contact_list(event: &Value) -> Vec<String> {
    let Some(attendees) = event.get("attendees").and_then(|a| a.as_array()) else {
        return Vec::new();
    };

    attendees
        .iter()
        .map(|attendee| {
            ["email", "displayName"]
                .iter()
                .find_map(|key| {
                    attendee
                        .get(*key)
                        .and_then(|v| v.as_str())
                        .filter(|v| !v.is_empty())
                })
                .unwrap_or("Unknown")
                .to_string()
        })
        .collect()
}

/// Upcoming events soonest first, past events newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventBuckets {
    pub upcoming: Vec<CalendarEvent>,
    pub past: Vec<CalendarEvent>,
}

/// Split an upstream listing around `now`, keeping [`BUCKET_SIZE`] events
/// per side. An event starting exactly at `now` counts as upcoming.
pub fn bucket_events(payload: &Value, now: DateTime<Utc>) -> EventBuckets {
    let (mut upcoming, mut past): (Vec<CalendarEvent>, Vec<CalendarEvent>) =
        extract_event_array(payload)
            .iter()
            .filter_map(CalendarEvent::from_event)
            .partition(|event| event.start_time >= now);

    upcoming.sort_by_key(|event| event.start_time);
    past.sort_by_key(|event| Reverse(event.start_time));
    upcoming.truncate(BUCKET_SIZE);
    past.truncate(BUCKET_SIZE);

    EventBuckets { upcoming, past }
}
