//! In-process store implementations.
//!
//! Back the engine with plain `Mutex<HashMap>` state. Used by the test
//! suites of every crate in the workspace (they exercise the real engine
//! and transports without a database) and usable for local experimentation.
//! Semantics mirror the Postgres implementations, including the generic
//! validation error on duplicate emails.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::{Identity, Profile};
use crate::session::SessionRecord;
use crate::store::{BlobStore, CredentialStore, SessionStore};
use crate::types::{SubjectId, Timestamp};

/// Identity + profile store over two maps behind one lock, so the
/// create-pair stays atomic exactly like the SQL transaction.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<CredentialState>,
}

#[derive(Default)]
struct CredentialState {
    identities: HashMap<SubjectId, Identity>,
    profiles: HashMap<SubjectId, Profile>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, identity: &Identity, profile: &Profile) -> Result<(), AuthError> {
        let mut state = self.lock()?;
        if state.identities.values().any(|i| i.email == identity.email) {
            return Err(AuthError::Validation("invalid registration data".into()));
        }
        state.identities.insert(identity.id, identity.clone());
        state.profiles.insert(identity.id, profile.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        let state = self.lock()?;
        Ok(state.identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Identity>, AuthError> {
        Ok(self.lock()?.identities.get(&id).cloned())
    }

    async fn find_profile(&self, id: SubjectId) -> Result<Option<Profile>, AuthError> {
        Ok(self.lock()?.profiles.get(&id).cloned())
    }

    async fn update_password_hash(&self, id: SubjectId, hash: &str) -> Result<(), AuthError> {
        let mut state = self.lock()?;
        let identity = state.identities.get_mut(&id).ok_or(AuthError::UserNotFound)?;
        identity.password_hash = hash.to_string();
        Ok(())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AuthError> {
        self.lock()?.profiles.insert(profile.identity_id, profile.clone());
        Ok(())
    }

    async fn set_photo_paths(
        &self,
        id: SubjectId,
        photo_path: &str,
        thumbnail_path: &str,
    ) -> Result<(), AuthError> {
        let mut state = self.lock()?;
        let profile = state.profiles.entry(id).or_insert_with(|| Profile {
            identity_id: id,
            ..Profile::default()
        });
        profile.photo_path = Some(photo_path.to_string());
        profile.thumbnail_path = Some(thumbnail_path.to_string());
        Ok(())
    }
}

impl MemoryCredentialStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CredentialState>, AuthError> {
        self.inner
            .lock()
            .map_err(|_| AuthError::Internal("credential store lock poisoned".into()))
    }
}

/// Session store keyed by the opaque token string.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &SessionRecord) -> Result<(), AuthError> {
        self.lock()?.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.lock()?.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), AuthError> {
        self.lock()?.remove(token);
        Ok(())
    }

    async fn delete_all_for_subject(&self, subject: SubjectId) -> Result<u64, AuthError> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, s| s.identity_id != subject);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, before: Timestamp) -> Result<u64, AuthError> {
        let mut sessions = self.lock()?;
        let count = sessions.len();
        sessions.retain(|_, s| s.expires_at >= before);
        Ok((count - sessions.len()) as u64)
    }
}

impl MemorySessionStore {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionRecord>>, AuthError> {
        self.sessions
            .lock()
            .map_err(|_| AuthError::Internal("session store lock poisoned".into()))
    }
}

/// Blob store that keeps photos in a map under `mem://` paths.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Test helper: fetch a stored blob back by path.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().ok()?.get(path).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8], ext: &str) -> Result<String, AuthError> {
        let path = format!("mem://{}.{}", Uuid::new_v4(), ext.trim_start_matches('.'));
        self.blobs
            .lock()
            .map_err(|_| AuthError::Internal("blob store lock poisoned".into()))?
            .insert(path.clone(), bytes.to_vec());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session_for(subject: SubjectId) -> SessionRecord {
        SessionRecord::issue(subject, chrono::Duration::hours(1))
    }

    #[tokio::test]
    async fn delete_all_for_subject_spares_other_subjects() {
        let store = MemorySessionStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let a1 = session_for(alice);
        let a2 = session_for(alice);
        let b1 = session_for(bob);
        for s in [&a1, &a2, &b1] {
            store.create(s).await.unwrap();
        }

        assert_eq!(store.delete_all_for_subject(alice).await.unwrap(), 2);
        assert!(store.find_by_token(&a1.token).await.unwrap().is_none());
        assert!(store.find_by_token(&a2.token).await.unwrap().is_none());
        assert!(store.find_by_token(&b1.token).await.unwrap().is_some());

        // Nothing left for alice; a second pass deletes zero.
        assert_eq!(store.delete_all_for_subject(alice).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_expired_uses_strict_cutoff() {
        let store = MemorySessionStore::default();
        let subject = Uuid::new_v4();

        let live = session_for(subject);
        let mut dead = session_for(subject);
        dead.expires_at = Utc::now() - chrono::Duration::seconds(10);
        store.create(&live).await.unwrap();
        store.create(&dead).await.unwrap();

        assert_eq!(store.delete_expired(Utc::now()).await.unwrap(), 1);
        assert!(store.find_by_token(&live.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blob_round_trip() {
        let store = MemoryBlobStore::default();
        let path = store.put(b"bytes", ".png").await.unwrap();
        assert!(path.ends_with(".png"));
        assert_eq!(store.get(&path).unwrap(), b"bytes");
    }
}
