//! Handlers for the authenticated `/me` resource (profile, password, photo).

use agora_core::identity::{Profile, ProfileInput};
use agora_core::types::SubjectId;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: SubjectId,
    pub email: String,
    pub role: String,
    pub profile: Option<Profile>,
}

/// Request body for `PUT /me/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Response body for `POST /me/photo`.
#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub photo_path: String,
    pub thumbnail_path: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let (identity, profile) = state.engine.get_profile(user.subject_id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            id: identity.id,
            email: identity.email,
            role: identity.role,
            profile,
        },
    }))
}

/// PUT /api/v1/auth/me
///
/// Replace the caller's profile fields. Photo paths are preserved; they
/// change only through the photo upload endpoint.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileInput>,
) -> AppResult<StatusCode> {
    state.engine.update_profile(user.subject_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/auth/me/password
///
/// Re-verify the old password and set a new one. Existing sessions stay
/// valid.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .engine
        .change_password(user.subject_id, &input.old_password, &input.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/me/photo
///
/// Accept a multipart upload with a `photo` file field, store the image
/// plus a generated thumbnail, and return both paths.
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<PhotoResponse>>> {
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let ext = field
            .file_name()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()))
            .ok_or_else(|| {
                AppError::BadRequest("Photo filename must have an extension".into())
            })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read photo field: {e}")))?;

        photo = Some((ext, bytes.to_vec()));
        break;
    }

    let (ext, bytes) =
        photo.ok_or_else(|| AppError::BadRequest("Missing 'photo' file field".into()))?;

    let (photo_path, thumbnail_path) = state
        .engine
        .upload_photo(user.subject_id, &bytes, &ext)
        .await?;

    Ok(Json(DataResponse {
        data: PhotoResponse {
            photo_path,
            thumbnail_path,
        },
    }))
}
