//! Persistence contracts consumed by the auth engine.
//!
//! Two narrow capability interfaces plus the opaque photo blob store. The
//! engine is written against these traits only; `agora-db` provides the
//! Postgres implementations and [`crate::memory`] the in-process ones used
//! by tests. Every operation is atomic at single-record granularity except
//! [`CredentialStore::create`], which must persist identity and profile in
//! one transaction (both rows exist or neither does).

use async_trait::async_trait;

use crate::error::AuthError;
use crate::identity::{Identity, Profile};
use crate::session::SessionRecord;
use crate::types::{SubjectId, Timestamp};

/// Identity + profile persistence.
///
/// A duplicate email on `create` surfaces as [`AuthError::Validation`] so
/// the transport boundary cannot distinguish it from other validation
/// failures. Connectivity failures surface as [`AuthError::Internal`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new identity and its profile atomically.
    async fn create(&self, identity: &Identity, profile: &Profile) -> Result<(), AuthError>;

    /// Case-sensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError>;

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Identity>, AuthError>;

    async fn find_profile(&self, id: SubjectId) -> Result<Option<Profile>, AuthError>;

    async fn update_password_hash(&self, id: SubjectId, hash: &str) -> Result<(), AuthError>;

    /// Create or replace the profile fields for `id`. Photo paths on the
    /// given profile are written as-is.
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AuthError>;

    /// Record the stored photo and thumbnail paths on the profile.
    async fn set_photo_paths(
        &self,
        id: SubjectId,
        photo_path: &str,
        thumbnail_path: &str,
    ) -> Result<(), AuthError>;
}

/// Session/refresh record persistence, keyed by the opaque token string.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, record: &SessionRecord) -> Result<(), AuthError>;

    /// `None` when no record carries the token; expiry is the caller's
    /// concern (lazy expiry is re-checked on every read).
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AuthError>;

    /// Idempotent: deleting an absent token is not an error.
    async fn delete_by_token(&self, token: &str) -> Result<(), AuthError>;

    /// Drop every session belonging to `subject`. Not required to be atomic
    /// with any other operation. Returns the number of deleted records.
    async fn delete_all_for_subject(&self, subject: SubjectId) -> Result<u64, AuthError>;

    /// Storage hygiene only: delete records whose expiry passed before
    /// `before`. Correctness never depends on this running.
    async fn delete_expired(&self, before: Timestamp) -> Result<u64, AuthError>;
}

/// Opaque binary photo storage collaborator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return an opaque path for later retrieval.
    async fn put(&self, bytes: &[u8], ext: &str) -> Result<String, AuthError>;
}
