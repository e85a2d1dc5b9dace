//! Filesystem-backed blob storage for uploaded photos.

use std::path::PathBuf;

use agora_core::error::AuthError;
use agora_core::store::BlobStore;
use async_trait::async_trait;
use uuid::Uuid;

/// Stores blobs as files under a root directory, named by a fresh UUID
/// plus the caller-supplied extension.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsBlobStore { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, bytes: &[u8], ext: &str) -> Result<String, AuthError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AuthError::internal("blob dir create", e))?;

        let filename = format!("{}.{ext}", Uuid::new_v4());
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AuthError::internal("blob write", e))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored blob");
        Ok(path.to_string_lossy().into_owned())
    }
}
