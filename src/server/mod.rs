//! HTTP surface: Google sign-in, calendar routes and the AI summary endpoint.

pub mod auth;
pub mod google;
pub mod handlers;
pub mod response;

use crate::components::ai_summary::MeetingSummarizer;
use crate::components::calendar::CalendarService;
use crate::components::connected_accounts::ConnectedAccounts;
use crate::config::Config;
use auth::{require_auth, AuthService};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{middleware, Router};
use google::GoogleOAuth;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Auth service for JWT operations
    pub auth_service: Arc<AuthService>,
    pub google: Arc<GoogleOAuth>,
    pub calendar: CalendarService,
    pub summarizer: MeetingSummarizer,
}

impl AppState {
    pub fn new(config: Config, http: reqwest::Client, accounts: Arc<dyn ConnectedAccounts>) -> Self {
        let auth_service = AuthService::new(&config.jwt_secret, config.token_expiration_minutes);
        let google = GoogleOAuth::new(http, &config);
        let calendar = CalendarService::new(accounts, &config.calendar_auth_config_id, config.summary);
        let summarizer = MeetingSummarizer::from_config(&config);

        Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
            google: Arc::new(google),
            calendar,
            summarizer,
        }
    }

    pub fn with_google(mut self, google: GoogleOAuth) -> Self {
        self.google = Arc::new(google);
        self
    }

    pub fn with_summarizer(mut self, summarizer: MeetingSummarizer) -> Self {
        self.summarizer = summarizer;
        self
    }
}

/// CORS for the configured frontend only, with credentials
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match frontend_url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Invalid FRONTEND_URL for CORS ({}): {}", frontend_url, e);
            layer
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/google", get(handlers::google_login))
        .route("/google/callback", get(handlers::google_callback))
        .route("/google/failure", get(handlers::google_failure))
        .route("/me", get(handlers::current_user))
        .route("/logout", post(handlers::logout));

    let calendar_routes = Router::new()
        .route("/status/{user_id}", get(handlers::calendar_status))
        .route("/connect/{user_id}", get(handlers::calendar_connect))
        .route("/events", get(handlers::calendar_overview))
        .route("/events/{user_id}", get(handlers::calendar_events))
        .route("/summary/{user_id}", get(handlers::calendar_summary))
        .route("/summary", post(handlers::ai_meeting_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/calendar", calendar_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.frontend_url))
        .with_state(state)
}
