//! Meeting summaries derived from raw calendar events.
//!
//! Events are normalized one by one ([`NormalizedMeeting`]), then aggregated
//! into cross-meeting insights ([`build_structured_summary`]). The
//! [`pipeline`] module picks which events take part.

pub mod aggregate;
pub mod highlights;
pub mod options;
pub mod pipeline;
pub mod text;

pub use aggregate::{attendee_list, date_range_label, top_occurrence, unique_list, TopOccurrence};
pub use highlights::{extract_highlights, Highlights, MAX_HIGHLIGHTS};
pub use options::{SummaryOptions, SummaryQuery};
pub use pipeline::{summarize_events, SummaryResponse};
pub use text::{clean_text, split_description_segments};

use crate::components::calendar::RawEvent;
use serde::Serialize;
use std::cmp::Reverse;

/// Cap for meeting titles
pub const TITLE_MAX_LENGTH: usize = 120;
/// Cap for meeting locations
pub const LOCATION_MAX_LENGTH: usize = 120;
/// Title used when an event has none
pub const DEFAULT_TITLE: &str = "Untitled event";

/// One meeting as shown in a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMeeting {
    pub title: String,
    /// `YYYY-MM-DD`, empty when the start is unknown
    pub date: String,
    pub attendees: Vec<String>,
    pub key_decisions: Vec<String>,
    pub next_steps: Vec<String>,
}

impl NormalizedMeeting {
    pub fn from_event(event: &RawEvent) -> Self {
        let title = clean_text(event.summary().unwrap_or_default(), TITLE_MAX_LENGTH);
        let title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };

        let Highlights {
            key_decisions,
            next_steps,
        } = extract_highlights(event.description().unwrap_or_default());

        Self {
            title,
            date: event.start_date().unwrap_or_default(),
            attendees: attendee_list(event),
            key_decisions,
            next_steps,
        }
    }
}

/// Insights plus the meetings they were drawn from, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeetingSummary {
    pub insights: Vec<String>,
    pub meetings: Vec<NormalizedMeeting>,
}

impl MeetingSummary {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Ordering key putting the newest event first; events without a usable
/// start count as the epoch and so land last.
pub fn recency_key(event: &RawEvent) -> Reverse<i64> {
    Reverse(
        event
            .start_instant()
            .map(|start| start.timestamp_millis())
            .unwrap_or(0),
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Build the summary for a non-empty set of events.
pub fn build_structured_summary(events: &[RawEvent]) -> MeetingSummary {
    let mut sorted: Vec<&RawEvent> = events.iter().collect();
    sorted.sort_by_key(|event| recency_key(event));

    let latest = sorted.first().and_then(|event| event.start_date());
    let earliest = sorted.last().and_then(|event| event.start_date());
    let range_label = date_range_label(earliest.as_deref(), latest.as_deref());

    let mut attendee_pool = Vec::new();
    let mut location_pool = Vec::new();
    let mut meetings = Vec::with_capacity(sorted.len());

    for event in &sorted {
        let meeting = NormalizedMeeting::from_event(event);
        attendee_pool.extend(meeting.attendees.iter().cloned());

        let location = clean_text(event.location().unwrap_or_default(), LOCATION_MAX_LENGTH);
        if !location.is_empty() {
            location_pool.push(location);
        }

        meetings.push(meeting);
    }

    let mut insights = vec![format!(
        "Captured {} meeting{} from {}.",
        meetings.len(),
        plural(meetings.len()),
        range_label
    )];

    if let Some(recent) = meetings.first().filter(|m| !m.date.is_empty()) {
        insights.push(format!(
            "Most recent session: {} on {}.",
            recent.title, recent.date
        ));
    }

    if let Some(top) = top_occurrence(&attendee_pool) {
        insights.push(format!(
            "Most frequent attendee: {} ({} meeting{}).",
            top.value,
            top.count,
            plural(top.count)
        ));
    }

    if let Some(top) = top_occurrence(&location_pool) {
        insights.push(format!("Popular location: {}.", top.value));
    }

    MeetingSummary { insights, meetings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> RawEvent {
        RawEvent(value)
    }

    #[test]
    fn test_normalized_meeting() {
        let meeting = NormalizedMeeting::from_event(&event(json!({
            "summary": "  <i>Roadmap</i>   review ",
            "start": { "dateTime": "2024-05-02T15:00:00Z" },
            "attendees": [{ "displayName": "Ada" }, { "email": "ada@example.com" }, { "displayName": "Ada" }],
            "description": "Agreed on Q3 scope\nFollow up with design"
        })));

        assert_eq!(meeting.title, "Roadmap review");
        assert_eq!(meeting.date, "2024-05-02");
        assert_eq!(meeting.attendees, vec!["Ada", "ada@example.com"]);
        assert_eq!(meeting.key_decisions, vec!["Agreed on Q3 scope"]);
        assert_eq!(meeting.next_steps, vec!["Follow up with design"]);
    }

    #[test]
    fn test_normalized_meeting_defaults() {
        let meeting = NormalizedMeeting::from_event(&event(json!({ "summary": "<br>" })));
        assert_eq!(meeting.title, DEFAULT_TITLE);
        assert_eq!(meeting.date, "");
        assert!(meeting.attendees.is_empty());
        assert!(meeting.key_decisions.is_empty());
        assert!(meeting.next_steps.is_empty());
    }

    #[test]
    fn test_build_structured_summary() {
        let events = vec![
            event(json!({
                "summary": "Kickoff",
                "start": { "dateTime": "2024-05-01T09:00:00Z" },
                "location": "Room 1",
                "attendees": [{ "displayName": "Ada" }, { "displayName": "Bob" }]
            })),
            event(json!({
                "summary": "Retro",
                "start": { "dateTime": "2024-05-09T09:00:00Z" },
                "location": "Room 2",
                "attendees": [{ "displayName": "Ada" }]
            })),
            event(json!({
                "summary": "Planning",
                "start": { "dateTime": "2024-05-05T09:00:00Z" },
                "location": "Room 2",
                "attendees": [{ "displayName": "Ada" }, { "displayName": "Cy" }]
            })),
        ];

        let summary = build_structured_summary(&events);

        let titles: Vec<&str> = summary.meetings.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Retro", "Planning", "Kickoff"]);
        assert_eq!(
            summary.insights,
            vec![
                "Captured 3 meetings from 2024-05-01 to 2024-05-09.",
                "Most recent session: Retro on 2024-05-09.",
                "Most frequent attendee: Ada (3 meetings).",
                "Popular location: Room 2.",
            ]
        );
    }

    #[test]
    fn test_single_meeting_wording() {
        let events = vec![event(json!({
            "summary": "1:1",
            "start": { "dateTime": "2024-05-01T09:00:00Z" },
            "attendees": [{ "email": "sam@example.com" }]
        }))];

        let summary = build_structured_summary(&events);
        assert_eq!(
            summary.insights,
            vec![
                "Captured 1 meeting from 2024-05-01.",
                "Most recent session: 1:1 on 2024-05-01.",
                "Most frequent attendee: sam@example.com (1 meeting).",
            ]
        );
    }

    #[test]
    fn test_unparsable_starts_sort_last() {
        let events = vec![
            event(json!({ "summary": "Mystery", "start": { "dateTime": "soon" } })),
            event(json!({ "summary": "Known", "start": { "dateTime": "2024-05-01T09:00:00Z" } })),
        ];

        let summary = build_structured_summary(&events);
        assert_eq!(summary.meetings[0].title, "Known");
        assert_eq!(summary.meetings[1].title, "Mystery");
        assert_eq!(summary.meetings[1].date, "");
        // Earliest date is unknown, so the label falls back to the latest one
        assert_eq!(summary.insights[0], "Captured 2 meetings from 2024-05-01.");
    }

    #[test]
    fn test_no_dates_at_all() {
        let events = vec![event(json!({ "summary": "Floating" }))];
        let summary = build_structured_summary(&events);
        assert_eq!(summary.insights, vec!["Captured 1 meeting from recent."]);
    }

    #[test]
    fn test_all_day_event_keeps_its_date() {
        let events = vec![event(json!({
            "summary": "Offsite",
            "start": { "date": "2024-05-01" },
            "end": { "date": "2024-05-02" }
        }))];

        let summary = build_structured_summary(&events);
        assert_eq!(summary.meetings[0].date, "2024-05-01");
        assert_eq!(
            summary.insights,
            vec![
                "Captured 1 meeting from 2024-05-01.",
                "Most recent session: Offsite on 2024-05-01.",
            ]
        );
    }

    #[test]
    fn test_summary_serialization() {
        let events = vec![event(json!({
            "summary": "Sync",
            "start": { "dateTime": "2024-05-01T09:00:00Z" },
            "description": "Decision: keep weekly cadence"
        }))];

        let value = serde_json::to_value(build_structured_summary(&events)).unwrap();
        assert_eq!(value["meetings"][0]["keyDecisions"][0], "Decision: keep weekly cadence");
        assert_eq!(value["meetings"][0]["nextSteps"], json!([]));
        assert_eq!(value["meetings"][0]["date"], "2024-05-01");
    }
}
