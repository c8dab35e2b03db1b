use crate::config::SummarySettings;
use serde::Deserialize;

/// Raw `limit` / `lookbackDays` query parameters of the summary endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryQuery {
    pub limit: Option<String>,
    #[serde(rename = "lookbackDays")]
    pub lookback_days: Option<String>,
}

/// How many past meetings to summarize, and how far back to look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub limit: usize,
    pub lookback_days: i64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        let settings = SummarySettings::default();
        Self {
            limit: settings.default_limit,
            lookback_days: settings.default_lookback_days,
        }
    }
}

impl SummaryOptions {
    /// Apply the request-layer rules: positive integers only, capped at the
    /// configured maximum, anything else falls back to the default.
    pub fn from_query(query: &SummaryQuery, settings: &SummarySettings) -> Self {
        let limit = positive_integer(query.limit.as_deref())
            .map(|limit| (limit as usize).min(settings.max_limit))
            .unwrap_or(settings.default_limit);

        let lookback_days = positive_integer(query.lookback_days.as_deref())
            .map(|days| days.min(settings.max_lookback_days))
            .unwrap_or(settings.default_lookback_days);

        Self {
            limit,
            lookback_days,
        }
    }
}

fn positive_integer(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, lookback_days: Option<&str>) -> SummaryQuery {
        SummaryQuery {
            limit: limit.map(str::to_string),
            lookback_days: lookback_days.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = SummarySettings::default();
        let options = SummaryOptions::from_query(&SummaryQuery::default(), &settings);
        assert_eq!(options, SummaryOptions { limit: 5, lookback_days: 30 });
        assert_eq!(options, SummaryOptions::default());
    }

    #[test]
    fn test_valid_values_are_used() {
        let settings = SummarySettings::default();
        let options = SummaryOptions::from_query(&query(Some("3"), Some("14")), &settings);
        assert_eq!(options, SummaryOptions { limit: 3, lookback_days: 14 });
    }

    #[test]
    fn test_values_are_clamped() {
        let settings = SummarySettings::default();
        let options = SummaryOptions::from_query(&query(Some("50"), Some("365")), &settings);
        assert_eq!(options, SummaryOptions { limit: 10, lookback_days: 90 });
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = SummarySettings::default();
        for (limit, days) in [("0", "0"), ("-2", "-7"), ("abc", "1.5"), ("", " ")] {
            let options = SummaryOptions::from_query(&query(Some(limit), Some(days)), &settings);
            assert_eq!(options, SummaryOptions { limit: 5, lookback_days: 30 }, "{limit} / {days}");
        }
    }

    #[test]
    fn test_custom_settings() {
        let settings = SummarySettings {
            default_limit: 2,
            max_limit: 4,
            default_lookback_days: 7,
            max_lookback_days: 14,
            event_window_days: 5,
        };
        assert_eq!(
            SummaryOptions::from_query(&SummaryQuery::default(), &settings),
            SummaryOptions { limit: 2, lookback_days: 7 }
        );
        assert_eq!(
            SummaryOptions::from_query(&query(Some("9"), Some("30")), &settings),
            SummaryOptions { limit: 4, lookback_days: 14 }
        );
    }

    #[test]
    fn test_query_deserialization() {
        let parsed: SummaryQuery = serde_json::from_value(serde_json::json!({
            "limit": "4",
            "lookbackDays": "12"
        }))
        .unwrap();
        assert_eq!(parsed.limit.as_deref(), Some("4"));
        assert_eq!(parsed.lookback_days.as_deref(), Some("12"));
    }
}
