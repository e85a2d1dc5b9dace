use agora_core::error::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`AuthError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `agora_core`.
    #[error(transparent)]
    Domain(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- AuthError variants ---
            AppError::Domain(domain) => match domain {
                AuthError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                ),
                // Token failures are indistinguishable to callers beyond
                // expired vs. otherwise invalid.
                AuthError::InvalidToken | AuthError::ExpiredToken => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHENTICATED",
                    "Invalid or expired token".to_string(),
                ),
                AuthError::SessionNotFound => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_NOT_FOUND",
                    "Invalid or expired session".to_string(),
                ),
                AuthError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHENTICATED",
                    "Authentication required".to_string(),
                ),
                AuthError::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "User not found".to_string(),
                ),
                AuthError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal domain error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
