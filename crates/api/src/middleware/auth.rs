//! Bearer-token authentication extractor for Axum handlers.

use agora_core::guard;
use agora_core::types::SubjectId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.subject_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The subject the access token was minted for.
    pub subject_id: SubjectId,
    /// The token's own id (from the payload `id` field).
    pub token_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let carrier = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        // All failures (missing header, malformed carrier, bad or expired
        // token) collapse into the same rejection.
        let payload = guard::authenticate(state.engine.codec(), carrier)?;

        Ok(AuthUser {
            subject_id: payload.user_id,
            token_id: payload.id,
        })
    }
}
