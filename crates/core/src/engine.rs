//! The authentication engine.
//!
//! Orchestrates registration, login, refresh, logout, password change, and
//! profile operations against the store contracts. This is the only
//! component with business invariants; it holds no per-subject state (every
//! operation is a self-contained request) and it never retries store
//! failures -- those surface as the generic internal error for the caller
//! to resolve.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::AuthError;
use crate::identity::{Identity, NewRegistration, Profile, ProfileInput};
use crate::password::{hash_password, validate_password_strength, verify_password};
use crate::session::SessionRecord;
use crate::store::{BlobStore, CredentialStore, SessionStore};
use crate::token::{AccessTokenPayload, TokenCodec};
use crate::types::SubjectId;

/// Pixel bound for the generated profile thumbnail (longest edge).
const THUMBNAIL_SIZE: u32 = 128;

/// Everything a successful login hands back to the client.
#[derive(Debug)]
pub struct LoginGrant {
    /// Short-lived encrypted access token.
    pub access_token: String,
    /// Opaque long-lived session token, exchangeable for fresh access tokens.
    pub session_token: String,
    /// The minted payload (expiry included) for response bodies.
    pub payload: AccessTokenPayload,
}

/// Transport-agnostic authentication/session engine.
pub struct AuthEngine {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    blobs: Arc<dyn BlobStore>,
    codec: TokenCodec,
    access_ttl: chrono::Duration,
    session_ttl: chrono::Duration,
}

impl AuthEngine {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        blobs: Arc<dyn BlobStore>,
        codec: TokenCodec,
        access_ttl: chrono::Duration,
        session_ttl: chrono::Duration,
    ) -> Self {
        AuthEngine {
            credentials,
            sessions,
            blobs,
            codec,
            access_ttl,
            session_ttl,
        }
    }

    /// The codec, for transports that instantiate the request guard.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Create a new identity plus profile and return the assigned id.
    ///
    /// A malformed email, a weak password, and a duplicate email all fail
    /// with the same `Validation` kind, so the transport boundary leaks
    /// nothing about which emails exist. Identity and profile are persisted
    /// in one logically atomic unit by the store.
    pub async fn register(&self, input: NewRegistration) -> Result<SubjectId, AuthError> {
        if !input.email.validate_email() {
            return Err(AuthError::Validation("invalid registration data".into()));
        }
        validate_password_strength(&input.password)
            .map_err(|_| AuthError::Validation("invalid registration data".into()))?;

        if self.credentials.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Validation("invalid registration data".into()));
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: hash_password(&input.password)?,
            role: input.role.filter(|r| !r.is_empty()).unwrap_or_else(|| "user".into()),
            created_at: Utc::now(),
        };
        let profile = input.profile.into_profile(identity.id);

        self.credentials.create(&identity, &profile).await?;
        tracing::info!(subject = %identity.id, "registered new identity");
        Ok(identity.id)
    }

    /// Verify credentials, mint an access token, and open a new session.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// Every login opens an independent session; existing sessions for the
    /// same subject are untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, AuthError> {
        let identity = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &identity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, payload) = self.codec.mint(identity.id, self.access_ttl)?;

        let session = SessionRecord::issue(identity.id, self.session_ttl);
        self.sessions.create(&session).await?;

        tracing::info!(subject = %identity.id, session = %session.id, "login succeeded");
        Ok(LoginGrant {
            access_token,
            session_token: session.token,
            payload,
        })
    }

    /// Exchange a live session token for a fresh access token.
    ///
    /// The session record itself is untouched: no TTL extension and no
    /// token rotation. An absent or lazily expired session is
    /// `SessionNotFound` either way.
    pub async fn refresh(
        &self,
        session_token: &str,
    ) -> Result<(String, AccessTokenPayload), AuthError> {
        let session = self
            .sessions
            .find_by_token(session_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired(Utc::now()) {
            return Err(AuthError::SessionNotFound);
        }

        self.codec.mint(session.identity_id, self.access_ttl)
    }

    /// Delete the session. Idempotent: an already-absent token succeeds.
    pub async fn logout(&self, session_token: &str) -> Result<(), AuthError> {
        self.sessions.delete_by_token(session_token).await
    }

    /// Re-verify the old password and persist a new hash.
    ///
    /// Mismatches fail with the same kind as a failed login. Existing
    /// sessions survive a password change.
    pub async fn change_password(
        &self,
        subject: SubjectId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password_strength(new_password)?;

        let identity = self
            .credentials
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(old_password, &identity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)?;
        self.credentials.update_password_hash(subject, &new_hash).await?;
        tracing::info!(subject = %subject, "password changed");
        Ok(())
    }

    /// Pure read of identity plus optional profile.
    pub async fn get_profile(
        &self,
        subject: SubjectId,
    ) -> Result<(Identity, Option<Profile>), AuthError> {
        let identity = self
            .credentials
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let profile = self.credentials.find_profile(subject).await?;
        Ok((identity, profile))
    }

    /// Replace the caller-editable profile fields, preserving photo paths.
    pub async fn update_profile(
        &self,
        subject: SubjectId,
        input: ProfileInput,
    ) -> Result<(), AuthError> {
        if self.credentials.find_by_id(subject).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let existing = self.credentials.find_profile(subject).await?;
        let mut profile = input.into_profile(subject);
        if let Some(existing) = existing {
            profile.photo_path = existing.photo_path;
            profile.thumbnail_path = existing.thumbnail_path;
        }
        self.credentials.upsert_profile(&profile).await
    }

    /// Store a profile photo plus a generated thumbnail, recording both
    /// paths on the profile. Bytes that do not decode as an image are a
    /// caller mistake, not an internal failure.
    pub async fn upload_photo(
        &self,
        subject: SubjectId,
        bytes: &[u8],
        ext: &str,
    ) -> Result<(String, String), AuthError> {
        if self.credentials.find_by_id(subject).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let img = image::load_from_memory(bytes)
            .map_err(|_| AuthError::Validation("unsupported image data".into()))?;

        let thumbnail = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        let mut thumb_bytes = Vec::new();
        thumbnail
            .write_to(
                &mut std::io::Cursor::new(&mut thumb_bytes),
                image::ImageFormat::Png,
            )
            .map_err(|e| AuthError::internal("thumbnail encode", e))?;

        let photo_path = self.blobs.put(bytes, ext).await?;
        let thumbnail_path = self.blobs.put(&thumb_bytes, "png").await?;

        self.credentials
            .set_photo_paths(subject, &photo_path, &thumbnail_path)
            .await?;
        Ok((photo_path, thumbnail_path))
    }

    /// Optional storage hygiene: delete sessions that expired before `now`.
    ///
    /// Safe to run concurrently with live traffic and safe to never run at
    /// all, since expiry is re-checked on every read.
    pub async fn sweep_expired_sessions(&self) -> Result<u64, AuthError> {
        self.sessions.delete_expired(Utc::now()).await
    }
}
