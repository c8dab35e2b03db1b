use super::google::GoogleProfile;
use super::response::ApiResponse;
use super::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

/// Cookie holding the session token
pub const AUTH_COOKIE: &str = "auth_token";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (Google account ID)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Google account ID, older tokens only carry `sub`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// The signed-in user attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub google_id: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        let google_id = claims
            .google_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| claims.sub.clone());
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            google_id,
        }
    }
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// Token is missing
    MissingToken,
    /// Token is invalid or expired
    InvalidToken,
    /// Token belongs to another user
    Forbidden,
    /// Some other error
    Other(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::failure("Missing authorization token")),
            )
                .into_response(),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::failure("Invalid or expired token")),
            )
                .into_response(),
            AuthError::Forbidden => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden" }))).into_response()
            }
            AuthError::Other(err) => {
                error!("Auth error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Token from the `auth_token` cookie, else from an `Authorization: Bearer` header
pub fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| match pair.trim().split_once('=') {
            Some((AUTH_COOKIE, value)) if !value.is_empty() => Some(value.to_string()),
            _ => None,
        });

    if let Some(token) = from_cookie {
        return Ok(token);
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::MissingToken),
    }
}

/// Issues and checks session tokens
pub struct AuthService {
    jwt_secret: String,
    token_expiration_minutes: i64,
}

impl AuthService {
    pub fn new(jwt_secret: &str, token_expiration_minutes: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            token_expiration_minutes,
        }
    }

    pub fn token_expiration_minutes(&self) -> i64 {
        self.token_expiration_minutes
    }

    /// Sign a token for a Google profile
    pub fn issue_token(&self, profile: &GoogleProfile) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.token_expiration_minutes);

        let claims = Claims {
            sub: profile.sub.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            picture: profile.picture.clone(),
            google_id: Some(profile.sub.clone()),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Other(format!("Failed to generate token: {}", e)))
    }

    /// Validate a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| {
            debug!("JWT validation error: {:?}", e);
            AuthError::InvalidToken
        })
    }

    /// Resolve the user behind a request's token
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = extract_token(headers)?;
        self.validate_token(&token).map(AuthUser::from)
    }
}

/// Middleware rejecting requests without a valid session token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = state.auth_service.authenticate(req.headers())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Only the owner of a calendar may act on it
pub fn ensure_user(user: &AuthUser, user_id: &str) -> Result<(), AuthError> {
    if user.google_id != user_id {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}
