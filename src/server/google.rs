use crate::config::Config;
use crate::error::{auth_error, config_error, upstream_error, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Basic profile returned by Google's userinfo endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleProfile {
    /// Google account ID
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    access_token: String,
}

/// Google sign-in (OAuth 2.0 authorization code flow)
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleOAuth {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_callback_url.clone(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    /// Point the flow at other endpoints
    pub fn with_endpoints(mut self, auth_url: &str, token_url: &str, userinfo_url: &str) -> Self {
        self.auth_url = auth_url.to_string();
        self.token_url = token_url.to_string();
        self.userinfo_url = userinfo_url.to_string();
        self
    }

    /// Consent page the browser is sent to
    pub fn authorize_url(&self, state: &str) -> AppResult<String> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| config_error(&format!("Invalid Google auth URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("prompt", "select_account")
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Trade an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> AppResult<String> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| upstream_error(&format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Token exchange failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let reply: TokenReply = response
            .json()
            .await
            .map_err(|e| upstream_error(&format!("Failed to parse token response: {}", e)))?;
        Ok(reply.access_token)
    }

    pub async fn fetch_profile(&self, access_token: &str) -> AppResult<GoogleProfile> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(auth_error(&format!("Profile request failed: HTTP {}", status)));
        }

        let profile: GoogleProfile = response
            .json()
            .await
            .map_err(|e| upstream_error(&format!("Failed to parse profile: {}", e)))?;
        debug!("Fetched Google profile {}", profile.sub);
        Ok(profile)
    }

    /// Complete the sign-in for an authorization code
    pub async fn authenticate(&self, code: &str) -> AppResult<GoogleProfile> {
        let access_token = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&access_token).await?;
        info!("Google sign-in for {}", profile.sub);
        Ok(profile)
    }
}
