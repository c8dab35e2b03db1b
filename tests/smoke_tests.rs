use katalyst::config::{Config, SummarySettings, DEFAULT_COMPOSIO_BASE_URL};
use katalyst::error::Error;
use std::env;

const REQUIRED: [&str; 4] = [
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "COMPOSIO_API_KEY",
    "GOOGLE_CALENDAR_AUTH_CONFIG",
];

/// Smoke test for loading the config from the environment.
///
/// Kept as one test because it mutates process-wide variables.
#[test]
fn test_config_from_environment() {
    for key in REQUIRED {
        env::set_var(key, format!("test-{}", key.to_lowercase()));
    }
    for key in ["PORT", "FRONTEND_URL", "APP_ENV", "GEMINI_API_KEY", "TOKEN_EXPIRATION_MINUTES"] {
        env::remove_var(key);
    }

    let config = Config::load().unwrap();
    assert_eq!(config.port, 5000);
    assert_eq!(config.frontend_url, "http://localhost:5173");
    assert_eq!(
        config.google_callback_url,
        "http://localhost:5000/api/auth/google/callback"
    );
    assert_eq!(config.calendar_auth_config_id, "test-google_calendar_auth_config");
    assert_eq!(config.composio_base_url, DEFAULT_COMPOSIO_BASE_URL);
    assert_eq!(config.token_expiration_minutes, 1440);
    assert!(config.gemini_api_key.is_none());
    assert!(!config.production);
    assert_eq!(config.summary, SummarySettings::default());

    env::set_var("PORT", "8080");
    env::set_var("APP_ENV", "Production");
    env::set_var("TOKEN_EXPIRATION_MINUTES", "-5");
    let config = Config::load().unwrap();
    assert_eq!(config.port, 8080);
    assert!(config.production);
    assert_eq!(config.token_expiration_minutes, 1440);

    env::remove_var("COMPOSIO_API_KEY");
    match Config::load() {
        Err(Error::Environment(message)) => {
            assert_eq!(message, "Missing environment variable: COMPOSIO_API_KEY")
        }
        other => panic!("expected missing variable error, got {:?}", other.map(|c| c.port)),
    }
}
