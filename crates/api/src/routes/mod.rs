pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register        register (public)
/// /auth/login           login (public)
/// /auth/refresh         refresh (public)
/// /auth/logout          logout (requires auth)
/// /auth/me              get, update profile (requires auth)
/// /auth/me/password     change password (requires auth)
/// /auth/me/photo        upload photo (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
