use super::models::{AccountList, ConnectedAccount, ConnectionRequest, ExecutionReply, ToolExecution};
use super::ConnectedAccounts;
use crate::error::{upstream_error, AppResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

/// Composio v3 REST client
#[derive(Debug, Clone)]
pub struct ComposioClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ComposioClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| upstream_error(&format!("Failed to parse URL: {}", e)))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> AppResult<Value> {
        let response = request
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| upstream_error(&format!("Failed to {}: {}", action, e)))?;

        let body = read_success(response, action).await?;
        debug!("Composio reply ({}): {}", action, body);
        Ok(body)
    }
}

async fn read_success(response: Response, action: &str) -> AppResult<Value> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(upstream_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| upstream_error(&format!("Failed to parse response to {}: {}", action, e)))
}

#[async_trait]
impl ConnectedAccounts for ComposioClient {
    async fn list_accounts(&self, user_id: &str) -> AppResult<Vec<ConnectedAccount>> {
        let mut url = self.url("/api/v3/connected_accounts")?;
        url.query_pairs_mut().append_pair("user_ids", user_id);

        let body = self
            .send(self.client.get(url), "list connected accounts")
            .await?;
        let list: AccountList = serde_json::from_value(body)?;
        Ok(list.items)
    }

    async fn initiate(&self, user_id: &str, auth_config_id: &str) -> AppResult<ConnectionRequest> {
        info!("Initiating calendar connection for user {}", user_id);

        let url = self.url("/api/v3/connected_accounts")?;
        let payload = json!({
            "auth_config": { "id": auth_config_id },
            "connection": { "user_id": user_id }
        });

        let body = self
            .send(self.client.post(url).json(&payload), "initiate connection")
            .await?;
        ConnectionRequest::from_value(&body)
            .ok_or_else(|| upstream_error("Connection request has no id"))
    }

    async fn execute_tool(&self, slug: &str, execution: ToolExecution) -> AppResult<Value> {
        debug!(
            "Executing {} for user {} on {}",
            slug, execution.user_id, execution.connected_account_id
        );

        let url = self.url(&format!("/api/v3/tools/execute/{}", slug))?;
        let body = self
            .send(self.client.post(url).json(&execution), "execute tool")
            .await?;

        let reply: ExecutionReply = serde_json::from_value(body.clone())?;
        if !reply.successful {
            return Err(upstream_error(&format!(
                "Tool {} failed: {}",
                slug,
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(reply.data.unwrap_or(body))
    }
}
