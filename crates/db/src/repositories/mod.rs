//! Postgres implementations of the core store contracts.

pub mod credential_store;
pub mod session_store;

pub use credential_store::PgCredentialStore;
pub use session_store::PgSessionStore;

use agora_core::error::AuthError;

/// Classify a sqlx error into the domain taxonomy.
///
/// Unique-constraint violations (constraint names starting with `uq_`) are
/// the caller's fault and surface as the same generic validation kind as any
/// other bad input; everything else is an internal failure carried outside
/// the domain taxonomy.
pub(crate) fn map_db_err(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint().is_some_and(|c| c.starts_with("uq_"))
        {
            return AuthError::Validation("invalid registration data".into());
        }
    }
    AuthError::internal("database", err)
}
