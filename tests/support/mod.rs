#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use katalyst::components::connected_accounts::{
    AuthConfigRef, ConnectedAccount, ConnectedAccounts, ConnectionRequest, ToolExecution,
};
use katalyst::config::{Config, SummarySettings};
use katalyst::error::{upstream_error, AppResult};
use serde_json::{json, Value};
use std::sync::Mutex;

pub const AUTH_CONFIG_ID: &str = "ac_calendar";
pub const USER_ID: &str = "user-1";

/// In-memory connected-accounts platform
#[derive(Default)]
pub struct MockConnectedAccounts {
    pub accounts: Vec<ConnectedAccount>,
    /// Reply of every tool execution
    pub events: Value,
    pub fail_executions: bool,
    executions: Mutex<Vec<(String, ToolExecution)>>,
    initiated: Mutex<Vec<(String, String)>>,
}

impl MockConnectedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: ConnectedAccount) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_events(mut self, events: Value) -> Self {
        self.events = events;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_executions = true;
        self
    }

    pub fn executions(&self) -> Vec<(String, ToolExecution)> {
        self.executions.lock().unwrap().clone()
    }

    pub fn initiated(&self) -> Vec<(String, String)> {
        self.initiated.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectedAccounts for MockConnectedAccounts {
    async fn list_accounts(&self, _user_id: &str) -> AppResult<Vec<ConnectedAccount>> {
        Ok(self.accounts.clone())
    }

    async fn initiate(&self, user_id: &str, auth_config_id: &str) -> AppResult<ConnectionRequest> {
        self.initiated
            .lock()
            .unwrap()
            .push((user_id.to_string(), auth_config_id.to_string()));
        Ok(ConnectionRequest {
            id: "req_1".to_string(),
            redirect_url: Some("https://connect.example.com/req_1".to_string()),
        })
    }

    async fn execute_tool(&self, slug: &str, execution: ToolExecution) -> AppResult<Value> {
        self.executions
            .lock()
            .unwrap()
            .push((slug.to_string(), execution));
        if self.fail_executions {
            return Err(upstream_error("calendar unavailable"));
        }
        Ok(self.events.clone())
    }
}

pub fn account(id: &str, auth_config_id: &str, status: &str) -> ConnectedAccount {
    ConnectedAccount {
        id: id.to_string(),
        status: status.to_string(),
        auth_config: AuthConfigRef {
            id: auth_config_id.to_string(),
        },
    }
}

pub fn active_account(id: &str) -> ConnectedAccount {
    account(id, AUTH_CONFIG_ID, "ACTIVE")
}

/// Event that started `hours_ago` hours before `now`
pub fn event_at(now: DateTime<Utc>, hours_ago: i64, title: &str) -> Value {
    json!({
        "summary": title,
        "start": { "dateTime": (now - Duration::hours(hours_ago)).to_rfc3339() },
    })
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        frontend_url: "http://localhost:5173".to_string(),
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        google_callback_url: "http://localhost:5000/api/auth/google/callback".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_expiration_minutes: 60,
        composio_api_key: "test-key".to_string(),
        composio_base_url: "http://localhost".to_string(),
        calendar_auth_config_id: AUTH_CONFIG_ID.to_string(),
        gemini_api_key: None,
        gemini_model: "gemini-pro".to_string(),
        production: false,
        summary: SummarySettings::default(),
    }
}
