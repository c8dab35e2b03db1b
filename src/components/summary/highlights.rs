use super::text::split_description_segments;
use serde::Serialize;

/// Per-category cap on extracted highlights
pub const MAX_HIGHLIGHTS: usize = 3;

/// Phrase test applied to a lower-cased segment
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Phrase appears anywhere
    Contains(&'static str),
    /// Phrase starts a word (`"todo"` matches "TODO:" and "todos", not "mastodon")
    WordPrefix(&'static str),
}

impl Trigger {
    fn matches(self, lower: &str) -> bool {
        match self {
            Trigger::Contains(phrase) => lower.contains(phrase),
            Trigger::WordPrefix(phrase) => lower.match_indices(phrase).any(|(idx, _)| {
                lower[..idx]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !c.is_alphanumeric())
            }),
        }
    }
}

const DECISION_TRIGGERS: [Trigger; 4] = [
    Trigger::Contains("decision"),
    Trigger::Contains("decided"),
    Trigger::Contains("agreed"),
    Trigger::WordPrefix("approved"),
];

const NEXT_STEP_TRIGGERS: [Trigger; 5] = [
    Trigger::Contains("next step"),
    Trigger::Contains("follow up"),
    Trigger::Contains("action item"),
    Trigger::Contains("action:"),
    Trigger::WordPrefix("todo"),
];

fn matches_any(triggers: &[Trigger], lower: &str) -> bool {
    triggers.iter().any(|trigger| trigger.matches(lower))
}

/// Decisions and follow-ups pulled out of a meeting description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub key_decisions: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Classify description segments into decisions and next steps.
///
/// Decisions are tested first; a segment taken as a decision is never also
/// a next step. A decision-like segment only falls through to the next-step
/// test once the decision list is full.
pub fn extract_highlights(description: &str) -> Highlights {
    let mut highlights = Highlights::default();

    for segment in split_description_segments(description) {
        let lower = segment.to_lowercase();

        if matches_any(&DECISION_TRIGGERS, &lower)
            && highlights.key_decisions.len() < MAX_HIGHLIGHTS
        {
            highlights.key_decisions.push(segment);
            continue;
        }

        if matches_any(&NEXT_STEP_TRIGGERS, &lower) && highlights.next_steps.len() < MAX_HIGHLIGHTS
        {
            highlights.next_steps.push(segment);
        }
    }

    highlights
}
