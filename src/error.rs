use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(katalyst::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(katalyst::config))]
    Config(String),

    /// The user has no active calendar connection
    #[error("{0}")]
    #[diagnostic(code(katalyst::not_connected))]
    NotConnected(String),

    #[error("Upstream error: {0}")]
    #[diagnostic(code(katalyst::upstream))]
    Upstream(String),

    #[error("Authentication error: {0}")]
    #[diagnostic(code(katalyst::auth))]
    Auth(String),

    #[error("HTTP client error: {0}")]
    #[diagnostic(code(katalyst::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(katalyst::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(katalyst::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(katalyst::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Core failures surface to the caller as a plain 500 with the message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create upstream (Composio, Google) errors
pub fn upstream_error(message: &str) -> Error {
    Error::Upstream(message.to_string())
}

/// Helper for users without a linked calendar
pub fn not_connected_error() -> Error {
    Error::NotConnected("User not connected".to_string())
}

/// Helper to create auth errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}
