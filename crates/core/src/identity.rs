//! Identity and profile models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{SubjectId, Timestamp};

/// A registered account capable of authenticating.
///
/// The password hash is an Argon2id PHC string and never leaves the engine.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: SubjectId,
    /// Unique, case-sensitive as stored.
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// Free-form profile data owned 1:1 by an [`Identity`].
///
/// Not required for authentication: login must tolerate a missing profile.
/// The address is an opaque structured blob the auth domain never inspects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Profile {
    pub identity_id: SubjectId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<serde_json::Value>,
    pub photo_path: Option<String>,
    pub thumbnail_path: Option<String>,
}

/// Profile fields accepted from callers on register and profile update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<serde_json::Value>,
}

impl ProfileInput {
    /// Materialize a profile row for the given subject. Photo paths are
    /// never set from caller input; only the photo upload path writes them.
    pub fn into_profile(self, identity_id: SubjectId) -> Profile {
        Profile {
            identity_id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            phone: self.phone,
            address: self.address,
            photo_path: None,
            thumbnail_path: None,
        }
    }
}

/// Input for [`crate::engine::AuthEngine::register`].
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    /// Defaults to `"user"` when empty.
    pub role: Option<String>,
    pub profile: ProfileInput,
}
