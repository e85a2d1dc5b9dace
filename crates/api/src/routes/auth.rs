//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{auth, profile};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register     -> register
/// POST /login        -> login
/// POST /refresh      -> refresh
/// POST /logout       -> logout (requires auth)
/// GET  /me           -> me (requires auth)
/// PUT  /me           -> update profile (requires auth)
/// PUT  /me/password  -> change password (requires auth)
/// POST /me/photo     -> upload photo (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(profile::me).put(profile::update_me))
        .route("/me/password", put(profile::change_password))
        .route("/me/photo", post(profile::upload_photo))
}
