use super::text::clean_text;
use crate::components::calendar::RawEvent;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Cap for a single attendee name
pub const ATTENDEE_MAX_LENGTH: usize = 100;

/// Most frequent value of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopOccurrence {
    pub value: String,
    pub count: usize,
}

/// Most frequent non-empty item; ties go to the item seen first.
pub fn top_occurrence<I, S>(items: I) -> Option<TopOccurrence>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for item in items {
        let item = item.as_ref();
        if item.is_empty() {
            continue;
        }
        match counts.get_mut(item) {
            Some(count) => *count += 1,
            None => {
                counts.insert(item.to_string(), 1);
                first_seen.push(item.to_string());
            }
        }
    }

    let mut top: Option<TopOccurrence> = None;
    for value in first_seen {
        let count = counts[&value];
        if top.as_ref().map_or(true, |best| count > best.count) {
            top = Some(TopOccurrence { value, count });
        }
    }
    top
}

/// Drop repeated entries, keeping the first occurrence of each
pub fn unique_list<T>(list: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Cleaned, de-duplicated attendee names of an event
pub fn attendee_list(event: &RawEvent) -> Vec<String> {
    unique_list(
        event
            .attendee_names()
            .into_iter()
            .map(|name| clean_text(name, ATTENDEE_MAX_LENGTH))
            .filter(|name| !name.is_empty()),
    )
}

/// Human-readable span covered by a set of meetings.
///
/// `"<earliest> to <latest>"` when both dates exist and differ, the latest
/// date alone when only it exists (or both are equal), otherwise `"recent"`.
pub fn date_range_label(earliest: Option<&str>, latest: Option<&str>) -> String {
    match (earliest, latest) {
        (Some(start), Some(end)) if start != end => format!("{} to {}", start, end),
        (_, Some(end)) => end.to_string(),
        _ => "recent".to_string(),
    }
}
