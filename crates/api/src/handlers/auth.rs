//! Handlers for the `/auth` resource (register, login, refresh, logout).

use agora_core::identity::ProfileInput;
use agora_core::types::{SubjectId, Timestamp};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileInput>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: SubjectId,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response: both halves of the grant.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub session_token: String,
    pub expires_at: Timestamp,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct SessionTokenRequest {
    pub session_token: String,
}

/// Successful refresh response: a fresh access token only. The session
/// token is never rotated.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account. Returns 201 with the assigned id.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let id = state
        .engine
        .register(agora_core::identity::NewRegistration {
            email: input.email,
            password: input.password,
            role: input.role,
            profile: input.profile.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token and a
/// session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let grant = state.engine.login(&input.email, &input.password).await?;

    Ok(Json(LoginResponse {
        access_token: grant.access_token,
        session_token: grant.session_token,
        expires_at: grant.payload.exp,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a live session token for a fresh access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<SessionTokenRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let (access_token, payload) = state.engine.refresh(&input.session_token).await?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_at: payload.exp,
    }))
}

/// POST /api/v1/auth/logout
///
/// Delete the given session. Idempotent. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<SessionTokenRequest>,
) -> AppResult<StatusCode> {
    state.engine.logout(&input.session_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
