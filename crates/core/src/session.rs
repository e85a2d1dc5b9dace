//! Server-side session (refresh) records.

use chrono::Utc;
use uuid::Uuid;

use crate::types::{SubjectId, Timestamp};

/// A long-lived session row, keyed by an opaque unguessable token string.
///
/// One record is created per login; concurrent sessions for the same subject
/// are independent. `expires_at` is fixed at creation and never extended --
/// refresh only mints new access tokens. Expiry is lazy: readers compare
/// timestamps, nothing depends on eager deletion.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub identity_id: SubjectId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl SessionRecord {
    /// Build a fresh session for `identity_id` with a random opaque token.
    pub fn issue(identity_id: SubjectId, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        SessionRecord {
            id: Uuid::new_v4(),
            identity_id,
            token: Uuid::new_v4().to_string(),
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Lazy expiry check, applied on every read.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_session_has_unique_token() {
        let subject = Uuid::new_v4();
        let a = SessionRecord::issue(subject, chrono::Duration::hours(24));
        let b = SessionRecord::issue(subject, chrono::Duration::hours(24));
        assert_ne!(a.token, b.token, "session tokens must be unguessable and distinct");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn expiry_is_lazy_and_strict() {
        let s = SessionRecord::issue(Uuid::new_v4(), chrono::Duration::seconds(-1));
        assert!(s.is_expired(Utc::now()));

        let s = SessionRecord::issue(Uuid::new_v4(), chrono::Duration::hours(1));
        assert!(!s.is_expired(Utc::now()));
    }
}
