use super::auth::{ensure_user, AuthUser, AUTH_COOKIE};
use super::response::{ApiError, ApiResponse, ApiResult};
use super::AppState;
use crate::components::ai_summary::{AiMeetingSummary, MeetingDetails};
use crate::components::calendar::{ConnectOutcome, ConnectionStatus, EventBuckets};
use crate::components::summary::{SummaryOptions, SummaryQuery, SummaryResponse};
use crate::config::Config;
use crate::error::{auth_error, AppResult};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

/// Cookie carrying the OAuth `state` between login and callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the OAuth state cookie
const OAUTH_STATE_MINUTES: i64 = 10;

/// Health check handler
pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn index_handler() -> &'static str {
    "API Running"
}

fn cookie(config: &Config, name: &'static str, value: String, minutes: i64) -> Cookie<'static> {
    let same_site = if config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .max_age(time::Duration::minutes(minutes))
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Frontend URL with extra query parameters
fn frontend_redirect(frontend_url: &str, params: &[(&str, &str)]) -> String {
    match Url::parse(frontend_url) {
        Ok(mut url) => {
            url.query_pairs_mut().extend_pairs(params);
            url.to_string()
        }
        Err(_) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            format!("{}?{}", frontend_url, query)
        }
    }
}

/// Start Google sign-in
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let oauth_state = Uuid::new_v4().to_string();
    let url = state.google.authorize_url(&oauth_state)?;

    let jar = jar.add(cookie(
        &state.config,
        OAUTH_STATE_COOKIE,
        oauth_state,
        OAUTH_STATE_MINUTES,
    ));
    Ok((jar, Redirect::to(&url)))
}

/// Query string Google sends back to the callback
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

async fn complete_sign_in(
    state: &AppState,
    params: CallbackParams,
    expected_state: Option<String>,
) -> AppResult<String> {
    if let Some(error) = params.error {
        return Err(auth_error(&format!("Google returned an error: {}", error)));
    }

    match (params.state, expected_state) {
        (Some(received), Some(expected)) if received == expected => {}
        _ => return Err(auth_error("OAuth state mismatch")),
    }

    let code = params
        .code
        .ok_or_else(|| auth_error("Missing authorization code"))?;
    let profile = state.google.authenticate(&code).await?;

    state.auth_service.issue_token(&profile).map_err(|e| {
        auth_error(&format!("Could not issue session token: {:?}", e))
    })
}

/// Finish Google sign-in; the session travels only in the HttpOnly cookie
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let jar = jar.remove(expired_cookie(OAUTH_STATE_COOKIE));

    match complete_sign_in(&state, params, expected_state).await {
        Ok(token) => {
            let target = frontend_redirect(&state.config.frontend_url, &[("auth", "success")]);
            let jar = jar.add(cookie(
                &state.config,
                AUTH_COOKIE,
                token,
                state.auth_service.token_expiration_minutes(),
            ));
            (jar, Redirect::to(&target))
        }
        Err(e) => {
            warn!("Google sign-in failed: {}", e);
            (jar, Redirect::to(&failure_target(&state.config)))
        }
    }
}

fn failure_target(config: &Config) -> String {
    frontend_redirect(&config.frontend_url, &[("auth", "failed")])
}

pub async fn google_failure(State(state): State<AppState>) -> Redirect {
    Redirect::to(&failure_target(&state.config))
}

/// The signed-in user, read from the session token
pub async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.auth_service.authenticate(&headers) {
        Ok(user) => Json(ApiResponse::ok(user, "User retrieved successfully")).into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::failure("Not authenticated")),
        )
            .into_response(),
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.remove(expired_cookie(AUTH_COOKIE)),
        Json(json!({ "success": true })),
    )
}

pub async fn calendar_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ConnectionStatus>> {
    ensure_user(&user, &user_id)?;
    Ok(Json(state.calendar.check_status(&user_id).await?))
}

pub async fn calendar_connect(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ConnectOutcome>> {
    ensure_user(&user, &user_id)?;
    Ok(Json(state.calendar.connect(&user_id).await?))
}

/// Upcoming and past events of the signed-in user
pub async fn calendar_overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<EventBuckets>>> {
    let buckets = state.calendar.get_event_buckets(&user.google_id).await?;
    Ok(Json(ApiResponse::ok(
        buckets,
        "Calendar events fetched successfully",
    )))
}

pub async fn calendar_events(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ensure_user(&user, &user_id)?;
    Ok(Json(state.calendar.get_events(&user_id).await?))
}

pub async fn calendar_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    ensure_user(&user, &user_id)?;

    let options = SummaryOptions::from_query(&query, state.calendar.settings());
    info!(
        "Summarizing up to {} meetings over {} days for {}",
        options.limit, options.lookback_days, user_id
    );
    Ok(Json(
        state
            .calendar
            .generate_meeting_summary(&user_id, options)
            .await?,
    ))
}

/// Body of the AI summary endpoint
#[derive(Debug, Default, Deserialize)]
pub struct MeetingSummaryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attendees: Option<Value>,
    pub duration: Option<Value>,
}

impl MeetingSummaryRequest {
    fn into_details(self) -> Option<MeetingDetails> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;

        let attendees = self
            .attendees
            .as_ref()
            .and_then(|a| a.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|a| a.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let duration = match self.duration {
            Some(Value::String(d)) if !d.is_empty() => d,
            Some(Value::Number(n)) => n.to_string(),
            _ => "Unknown".to_string(),
        };

        Some(MeetingDetails {
            title,
            description: self.description.unwrap_or_default(),
            attendees,
            duration,
        })
    }
}

/// Generative summary of a single meeting
pub async fn ai_meeting_summary(
    State(state): State<AppState>,
    Json(body): Json<MeetingSummaryRequest>,
) -> ApiResult<Json<ApiResponse<AiMeetingSummary>>> {
    let details = body
        .into_details()
        .ok_or_else(|| ApiError::BadRequest("Meeting title is required".to_string()))?;

    let summary = state.summarizer.summarize(&details).await;
    Ok(Json(ApiResponse::ok(
        summary,
        "Meeting summary generated successfully",
    )))
}
