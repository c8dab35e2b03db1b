use super::models::RawEvent;
use serde_json::Value;

/// Response wrappers the calendar integration is known to use, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// The payload is the event array itself
    Bare,
    /// The array sits under a key, directly or one `items` level below it
    Keyed(&'static str),
}

const ENVELOPES: [Envelope; 4] = [
    Envelope::Bare,
    Envelope::Keyed("items"),
    Envelope::Keyed("events"),
    Envelope::Keyed("data"),
];

impl Envelope {
    fn unwrap(self, payload: &Value) -> Option<&Vec<Value>> {
        match self {
            Envelope::Bare => payload.as_array(),
            Envelope::Keyed(key) => {
                let inner = payload.get(key)?;
                inner
                    .as_array()
                    .or_else(|| inner.get("items").and_then(|items| items.as_array()))
            }
        }
    }
}

/// Pull the event list out of an upstream response.
///
/// Unknown shapes yield an empty list instead of an error.
pub fn extract_event_array(payload: &Value) -> Vec<RawEvent> {
    ENVELOPES
        .iter()
        .find_map(|envelope| envelope.unwrap(payload))
        .map(|events| events.iter().cloned().map(RawEvent).collect())
        .unwrap_or_default()
}
