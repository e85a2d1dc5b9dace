//! Rows for the `sessions` table.

use agora_core::session::SessionRecord;
use agora_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

/// A `sessions` row.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        SessionRecord {
            id: row.id,
            identity_id: row.identity_id,
            token: row.token,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}
