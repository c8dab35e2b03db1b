use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to the auth config an account was created from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfigRef {
    #[serde(default)]
    pub id: String,
}

/// An account a user has linked (or started linking)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub id: String,
    /// `ACTIVE`, `INITIATED`, `EXPIRED`, ...
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub auth_config: AuthConfigRef,
}

/// Pending connection created by an initiate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub id: String,
    /// Where the user completes the provider consent
    pub redirect_url: Option<String>,
}

impl ConnectionRequest {
    /// Read an initiate reply; the redirect has been reported under several names
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = value.get("id").and_then(|id| id.as_str())?.to_string();
        let redirect_url = ["redirect_url", "redirect_uri", "redirectUrl"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|url| url.as_str()))
            .map(str::to_string);

        Some(Self { id, redirect_url })
    }
}

/// Input of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolExecution {
    pub user_id: String,
    pub connected_account_id: String,
    pub arguments: Value,
}

/// Page of `GET /api/v3/connected_accounts`
#[derive(Debug, Deserialize)]
pub(crate) struct AccountList {
    #[serde(default)]
    pub items: Vec<ConnectedAccount>,
}

/// Reply of `POST /api/v3/tools/execute/{slug}`
#[derive(Debug, Deserialize)]
pub(crate) struct ExecutionReply {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "default_successful")]
    pub successful: bool,
}

fn default_successful() -> bool {
    true
}
