//! Domain error taxonomy shared by the engine, the stores, and both
//! transports.
//!
//! `InvalidCredentials` covers both "no such user" and "wrong
//! password" so a caller can never probe which emails are registered. Store
//! connectivity problems surface as [`AuthError::Internal`], distinct from
//! the domain kinds; the engine never retries them.

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed input, rejected before touching storage. Duplicate emails
    /// on registration surface as this same generic kind.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Wrong email + password combination. Covers unknown emails too.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token bytes failed authentication or could not be decoded.
    #[error("invalid token")]
    InvalidToken,

    /// Token authenticated correctly but is past its expiry.
    #[error("token has expired")]
    ExpiredToken,

    /// Refresh or logout against an absent or expired session.
    #[error("session not found or expired")]
    SessionNotFound,

    /// Profile lookup for an identity that no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Guard-level rejection: missing, malformed, or unverifiable bearer
    /// credential. Transport-facing superset of the token errors.
    #[error("not authenticated")]
    Unauthenticated,

    /// Store or infrastructure failure. The message is for logs only and is
    /// never shown to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Wrap an infrastructure failure, logging it at error level.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, context, "internal failure");
        AuthError::Internal(format!("{context}: {err}"))
    }
}
