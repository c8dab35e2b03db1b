use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default frontend origin used for redirects and CORS
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Default base URL of the Composio API
pub const DEFAULT_COMPOSIO_BASE_URL: &str = "https://backend.composio.dev";

/// Location of the optional summary limits overlay
pub const SUMMARY_CONFIG_PATH: &str = "config/summary.toml";

/// Upper bound for any lookback or fetch window, in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Main configuration structure for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Frontend origin (redirect target and CORS origin)
    pub frontend_url: String,
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Google OAuth redirect URI
    pub google_callback_url: String,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime in minutes
    pub token_expiration_minutes: i64,
    /// Composio API key
    pub composio_api_key: String,
    /// Composio API base URL
    pub composio_base_url: String,
    /// Composio auth config that identifies Google Calendar connections
    pub calendar_auth_config_id: String,
    /// Gemini API key, summaries fall back to a canned reply without it
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Whether cookies should be marked secure / cross-site
    pub production: bool,
    /// Limits applied to meeting summary requests
    pub summary: SummarySettings,
}

/// Limits and defaults for the meeting summary endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub default_limit: usize,
    pub max_limit: usize,
    pub default_lookback_days: i64,
    pub max_lookback_days: i64,
    /// Half-width of the event fetch window around now, in days
    pub event_window_days: i64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 10,
            default_lookback_days: 30,
            max_lookback_days: 90,
            event_window_days: 5,
        }
    }
}

impl SummarySettings {
    /// Load the overlay file, keeping defaults when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match Self::parse(&content) {
            Ok(settings) => {
                info!("Loaded summary settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring invalid summary settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse and validate an overlay; keys left out keep their defaults
    pub fn parse(content: &str) -> AppResult<Self> {
        let settings: SummarySettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Limits must be positive and every day count within `1..=MAX_WINDOW_DAYS`
    pub fn validate(&self) -> AppResult<()> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(config_error("summary limits must be positive"));
        }

        for (key, days) in [
            ("default_lookback_days", self.default_lookback_days),
            ("max_lookback_days", self.max_lookback_days),
            ("event_window_days", self.event_window_days),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(config_error(&format!(
                    "{} must be between 1 and {}, got {}",
                    key, MAX_WINDOW_DAYS, days
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let composio_api_key =
            env::var("COMPOSIO_API_KEY").map_err(|_| env_error("COMPOSIO_API_KEY"))?;
        let calendar_auth_config_id = env::var("GOOGLE_CALENDAR_AUTH_CONFIG")
            .map_err(|_| env_error("GOOGLE_CALENDAR_AUTH_CONFIG"))?;

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);

        let token_expiration_minutes = env::var("TOKEN_EXPIRATION_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(60 * 24);

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Config {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            google_client_id,
            google_client_secret,
            google_callback_url: env::var("GOOGLE_CALLBACK_URL").unwrap_or_else(|_| {
                format!("http://localhost:{}/api/auth/google/callback", port)
            }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "katalyst_jwt_secret".to_string()),
            token_expiration_minutes,
            composio_api_key,
            composio_base_url: env::var("COMPOSIO_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_COMPOSIO_BASE_URL.to_string()),
            calendar_auth_config_id,
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string()),
            production,
            summary: SummarySettings::load_from(Path::new(SUMMARY_CONFIG_PATH)),
        })
    }
}
