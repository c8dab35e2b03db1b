//! Linked third-party accounts, managed by the Composio platform.
//!
//! The rest of the crate only sees the [`ConnectedAccounts`] trait, so the
//! calendar service can be exercised against an in-memory implementation.

mod client;
pub mod models;

pub use client::ComposioClient;
pub use models::{AuthConfigRef, ConnectedAccount, ConnectionRequest, ToolExecution};

use crate::error::AppResult;
use async_trait::async_trait;
use serde_json::Value;

/// Operations of the connected-accounts platform used by this service
#[async_trait]
pub trait ConnectedAccounts: Send + Sync {
    /// All accounts linked by a user, in any state
    async fn list_accounts(&self, user_id: &str) -> AppResult<Vec<ConnectedAccount>>;

    /// Start linking a new account; the user finishes at the returned redirect URL
    async fn initiate(&self, user_id: &str, auth_config_id: &str) -> AppResult<ConnectionRequest>;

    /// Run a tool against a linked account and return its output
    async fn execute_tool(&self, slug: &str, execution: ToolExecution) -> AppResult<Value>;
}
