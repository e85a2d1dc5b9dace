//! Rows for the `identities` and `profiles` tables.

use agora_core::identity::{Identity, Profile};
use agora_core::types::Timestamp;
use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

/// An `identities` row.
#[derive(Debug, Clone, FromRow)]
pub struct IdentityRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// A `profiles` row.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub identity_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address_blob: Option<serde_json::Value>,
    pub photo_path: Option<String>,
    pub thumbnail_path: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            identity_id: row.identity_id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            phone: row.phone,
            address: row.address_blob,
            photo_path: row.photo_path,
            thumbnail_path: row.thumbnail_path,
        }
    }
}
