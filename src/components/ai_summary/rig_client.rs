use super::SummaryModel;
use crate::error::{upstream_error, AppResult};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

const SYSTEM_PROMPT: &str = "You are an AI assistant that summarizes meetings. Reply with JSON only.";

/// Gemini through rig
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SummaryModel for GeminiModel {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        info!("Requesting meeting summary from Gemini model {}", self.model);

        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PROMPT)
            .temperature(0.2)
            .build();

        let response = agent
            .chat(prompt.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| upstream_error(&format!("Rig API request failed: {}", e)))?;

        info!("Received response from Gemini");
        Ok(response)
    }
}
