//! Session persistence over the `sessions` table.

use agora_core::error::AuthError;
use agora_core::session::SessionRecord;
use agora_core::store::SessionStore;
use agora_core::types::{SubjectId, Timestamp};
use async_trait::async_trait;

use crate::models::session::SessionRow;
use crate::repositories::map_db_err;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, identity_id, token, expires_at, created_at";

/// Postgres-backed [`SessionStore`].
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        PgSessionStore { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, record: &SessionRecord) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO sessions (id, identity_id, token, expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.id)
        .bind(record.identity_id)
        .bind(&record.token)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        // Expiry is not filtered here: lazy expiry is the engine's check.
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE token = $1");
        let row = sqlx::query_as::<_, SessionRow>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(SessionRecord::from))
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete_all_for_subject(&self, subject: SubjectId) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE identity_id = $1")
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, before: Timestamp) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected())
    }
}
