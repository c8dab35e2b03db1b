//! Generative summary of a single meeting.
//!
//! The model sits behind [`SummaryModel`]; every failure is swallowed and
//! turned into [`AiMeetingSummary::unavailable`].

#[cfg(feature = "ai-summary")]
mod rig_client;

#[cfg(feature = "ai-summary")]
pub use rig_client::GeminiModel;

use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Summary used when the reply has no usable `summary` field
pub const DEFAULT_SUMMARY: &str = "Summary generated successfully.";

/// Summary returned when the model cannot be reached
pub const FALLBACK_SUMMARY: &str =
    "Unable to generate AI summary at this time. Please try again later.";

/// Length of the raw-text excerpt used when a reply is not JSON
const RAW_EXCERPT_LENGTH: usize = 200;

lazy_static! {
    static ref JSON_FENCE: Regex = Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fence pattern");
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").expect("object pattern");
}

/// What the caller knows about a meeting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingDetails {
    pub title: String,
    pub description: String,
    pub attendees: Vec<String>,
    pub duration: String,
}

/// Model-written summary of one meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMeetingSummary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
}

impl AiMeetingSummary {
    fn text_only(summary: String) -> Self {
        Self {
            summary,
            key_points: Vec::new(),
            action_items: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self::text_only(FALLBACK_SUMMARY.to_string())
    }
}

/// A text-generation backend
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// Prompt asking for a JSON summary of the meeting
pub fn build_prompt(details: &MeetingDetails) -> String {
    let description = if details.description.is_empty() {
        "No description provided"
    } else {
        &details.description
    };
    let attendees = if details.attendees.is_empty() {
        "No attendees listed".to_string()
    } else {
        details.attendees.join(", ")
    };

    format!(
        "You are an AI assistant that summarizes meetings. Based on the following meeting details, provide a concise summary:

Meeting Title: {}
Description: {}
Attendees: {}
Duration: {}

Please provide:
1. A brief summary (2-3 sentences)
2. Key points discussed (3-5 bullet points)
3. Action items (if any, otherwise state \"No specific action items\")

Format your response as JSON with this structure:
{{
  \"summary\": \"brief summary text\",
  \"keyPoints\": [\"point 1\", \"point 2\", ...],
  \"actionItems\": [\"action 1\", \"action 2\", ...]
}}",
        details.title, description, attendees, details.duration
    )
}

/// Read a model reply: a ```json block, else the outermost braces, else the whole text
pub fn parse_summary_from_response(response: &str) -> AiMeetingSummary {
    let candidate = JSON_FENCE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .or_else(|| JSON_OBJECT.find(response))
        .map(|m| m.as_str())
        .unwrap_or(response);

    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(parsed) => AiMeetingSummary {
            summary: parsed
                .get("summary")
                .and_then(|s| s.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SUMMARY)
                .to_string(),
            key_points: string_list(parsed.get("keyPoints")),
            action_items: string_list(parsed.get("actionItems")),
        },
        Err(e) => {
            warn!("Model reply is not JSON, using the raw text: {}", e);
            let excerpt: String = response.chars().take(RAW_EXCERPT_LENGTH).collect();
            if excerpt.is_empty() {
                AiMeetingSummary::text_only(DEFAULT_SUMMARY.to_string())
            } else {
                AiMeetingSummary::text_only(excerpt)
            }
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Summarizes meetings with an optional model
#[derive(Clone, Default)]
pub struct MeetingSummarizer {
    model: Option<Arc<dyn SummaryModel>>,
}

impl MeetingSummarizer {
    pub fn new(model: Option<Arc<dyn SummaryModel>>) -> Self {
        Self { model }
    }

    /// Gemini when a key is configured (and the feature is built in)
    pub fn from_config(config: &Config) -> Self {
        #[cfg(feature = "ai-summary")]
        if let Some(api_key) = &config.gemini_api_key {
            info!("AI summaries enabled with model {}", config.gemini_model);
            return Self::new(Some(Arc::new(GeminiModel::new(api_key, &config.gemini_model))));
        }

        #[cfg(not(feature = "ai-summary"))]
        let _ = config;

        warn!("GEMINI_API_KEY not set, AI summaries will use the fallback reply");
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn summarize(&self, details: &MeetingDetails) -> AiMeetingSummary {
        let Some(model) = &self.model else {
            return AiMeetingSummary::unavailable();
        };

        match model.complete(&build_prompt(details)).await {
            Ok(response) => parse_summary_from_response(&response),
            Err(e) => {
                error!("Error generating meeting summary: {}", e);
                AiMeetingSummary::unavailable()
            }
        }
    }
}
