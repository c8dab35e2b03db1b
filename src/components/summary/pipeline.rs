use super::options::SummaryOptions;
use super::{build_structured_summary, recency_key, MeetingSummary};
use crate::components::calendar::{extract_event_array, RawEvent};
use crate::utils::time::{days_before, iso_millis};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Payload returned by the meeting summary endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResponse {
    pub summary: MeetingSummary,
    /// The selected events, unchanged, newest first
    pub events: Vec<RawEvent>,
    #[serde(rename = "generatedAt", serialize_with = "iso_millis::serialize")]
    pub generated_at: DateTime<Utc>,
}

impl SummaryResponse {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            summary: MeetingSummary::empty(),
            events: Vec::new(),
            generated_at: now,
        }
    }
}

/// Summarize the past meetings found in an upstream event listing.
///
/// Keeps events that started before `now` and no earlier than
/// `options.lookback_days` ago, newest first, at most `options.limit` of them
/// (a zero limit still selects one). Events without a usable start are
/// never selected.
pub fn summarize_events(
    payload: &Value,
    options: &SummaryOptions,
    now: DateTime<Utc>,
) -> SummaryResponse {
    let events = extract_event_array(payload);
    if events.is_empty() {
        return SummaryResponse::empty(now);
    }

    let threshold = days_before(now, options.lookback_days);
    let mut selected: Vec<RawEvent> = events
        .into_iter()
        .filter(|event| {
            event
                .start_instant()
                .is_some_and(|start| start < now && start >= threshold)
        })
        .collect();

    selected.sort_by_key(recency_key);
    selected.truncate(options.limit.max(1));

    debug!(
        "Selected {} past events for summary (lookback {} days)",
        selected.len(),
        options.lookback_days
    );

    if selected.is_empty() {
        return SummaryResponse::empty(now);
    }

    SummaryResponse {
        summary: build_structured_summary(&selected),
        events: selected,
        generated_at: now,
    }
}
