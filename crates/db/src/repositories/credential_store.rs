//! Identity + profile persistence over the `identities` and `profiles`
//! tables.

use agora_core::error::AuthError;
use agora_core::identity::{Identity, Profile};
use agora_core::store::CredentialStore;
use agora_core::types::SubjectId;
use async_trait::async_trait;

use crate::models::identity::{IdentityRow, ProfileRow};
use crate::repositories::map_db_err;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const IDENTITY_COLUMNS: &str = "id, email, password_hash, role, created_at";

const PROFILE_COLUMNS: &str = "identity_id, first_name, last_name, date_of_birth, phone, \
                               address_blob, photo_path, thumbnail_path";

/// Postgres-backed [`CredentialStore`].
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        PgCredentialStore { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(&self, identity: &Identity, profile: &Profile) -> Result<(), AuthError> {
        // Identity and profile must commit or roll back together.
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        sqlx::query(
            "INSERT INTO identities (id, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(identity.id)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(&identity.role)
        .bind(identity.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            "INSERT INTO profiles (identity_id, first_name, last_name, date_of_birth,
                                   phone, address_blob, photo_path, thumbnail_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(identity.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.date_of_birth)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.photo_path)
        .bind(&profile.thumbnail_path)
        .execute(&mut *tx)
        .await
        .map_err(map_db_err)?;

        tx.commit().await.map_err(map_db_err)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        let query = format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1");
        let row = sqlx::query_as::<_, IdentityRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Identity::from))
    }

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Identity>, AuthError> {
        let query = format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1");
        let row = sqlx::query_as::<_, IdentityRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Identity::from))
    }

    async fn find_profile(&self, id: SubjectId) -> Result<Option<Profile>, AuthError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE identity_id = $1");
        let row = sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(Profile::from))
    }

    async fn update_password_hash(&self, id: SubjectId, hash: &str) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE identities SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO profiles (identity_id, first_name, last_name, date_of_birth,
                                   phone, address_blob, photo_path, thumbnail_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (identity_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                date_of_birth = EXCLUDED.date_of_birth,
                phone = EXCLUDED.phone,
                address_blob = EXCLUDED.address_blob,
                photo_path = EXCLUDED.photo_path,
                thumbnail_path = EXCLUDED.thumbnail_path",
        )
        .bind(profile.identity_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.date_of_birth)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.photo_path)
        .bind(&profile.thumbnail_path)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn set_photo_paths(
        &self,
        id: SubjectId,
        photo_path: &str,
        thumbnail_path: &str,
    ) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO profiles (identity_id, photo_path, thumbnail_path)
             VALUES ($1, $2, $3)
             ON CONFLICT (identity_id) DO UPDATE SET
                photo_path = EXCLUDED.photo_path,
                thumbnail_path = EXCLUDED.thumbnail_path",
        )
        .bind(id)
        .bind(photo_path)
        .bind(thumbnail_path)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }
}
