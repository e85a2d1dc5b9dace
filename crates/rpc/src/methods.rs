//! Method dispatch: decode params, gate protected methods through the
//! shared guard, call the engine, and shape results.

use agora_core::engine::AuthEngine;
use agora_core::error::AuthError;
use agora_core::guard;
use agora_core::identity::{NewRegistration, ProfileInput};
use agora_core::token::AccessTokenPayload;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use crate::types::{RpcRequest, RpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};

/// Failure modes of a single method call.
enum CallError {
    /// Params did not match the method's schema.
    Params(serde_json::Error),
    Domain(AuthError),
}

impl From<AuthError> for CallError {
    fn from(err: AuthError) -> Self {
        CallError::Domain(err)
    }
}

type CallResult = Result<serde_json::Value, CallError>;

#[derive(Debug, Deserialize)]
struct RegisterParams {
    email: String,
    password: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    profile: Option<ProfileInput>,
}

#[derive(Debug, Deserialize)]
struct LoginParams {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SessionTokenParams {
    session_token: String,
}

#[derive(Debug, Deserialize)]
struct ChangePasswordParams {
    old_password: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct UploadPhotoParams {
    /// Base64-encoded image bytes.
    photo_data: String,
    ext: String,
}

/// Handle one decoded request envelope.
pub async fn dispatch(engine: &AuthEngine, req: RpcRequest) -> RpcResponse {
    if req.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
        return RpcResponse::error(req.id, INVALID_REQUEST, "unsupported jsonrpc version");
    }

    let RpcRequest {
        id,
        method,
        params,
        metadata,
        ..
    } = req;

    // Protected methods run the guard before anything else. The bootstrap
    // methods stay public: the caller holds no token yet.
    let outcome = match method.as_str() {
        "auth.register" => register(engine, params).await,
        "auth.login" => login(engine, params).await,
        "auth.refresh" => refresh(engine, params).await,
        "auth.logout" | "auth.me" | "auth.updateProfile" | "auth.changePassword"
        | "auth.uploadPhoto" => {
            let payload = match authenticate(engine, &metadata) {
                Ok(payload) => payload,
                Err(err) => return RpcResponse::domain_error(id, err),
            };
            match method.as_str() {
                "auth.logout" => logout(engine, params).await,
                "auth.me" => me(engine, &payload).await,
                "auth.updateProfile" => update_profile(engine, &payload, params).await,
                "auth.changePassword" => change_password(engine, &payload, params).await,
                "auth.uploadPhoto" => upload_photo(engine, &payload, params).await,
                _ => unreachable!("guarded method list is exhaustive"),
            }
        }
        other => {
            return RpcResponse::error(id, METHOD_NOT_FOUND, format!("unknown method: {other}"))
        }
    };

    match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(CallError::Params(err)) => {
            RpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {err}"))
        }
        Err(CallError::Domain(err)) => RpcResponse::domain_error(id, err),
    }
}

/// Run the shared guard against the `authorization` metadata entry.
fn authenticate(
    engine: &AuthEngine,
    metadata: &std::collections::HashMap<String, String>,
) -> Result<AccessTokenPayload, AuthError> {
    guard::authenticate(engine.codec(), metadata.get("authorization").map(String::as_str))
}

fn decode<T: for<'de> Deserialize<'de>>(params: serde_json::Value) -> Result<T, CallError> {
    serde_json::from_value(params).map_err(CallError::Params)
}

async fn register(engine: &AuthEngine, params: serde_json::Value) -> CallResult {
    let p: RegisterParams = decode(params)?;
    let id = engine
        .register(NewRegistration {
            email: p.email,
            password: p.password,
            role: p.role,
            profile: p.profile.unwrap_or_default(),
        })
        .await?;
    Ok(json!({ "id": id }))
}

async fn login(engine: &AuthEngine, params: serde_json::Value) -> CallResult {
    let p: LoginParams = decode(params)?;
    let grant = engine.login(&p.email, &p.password).await?;
    Ok(json!({
        "access_token": grant.access_token,
        "session_token": grant.session_token,
        "expires_at": grant.payload.exp,
    }))
}

async fn refresh(engine: &AuthEngine, params: serde_json::Value) -> CallResult {
    let p: SessionTokenParams = decode(params)?;
    let (access_token, payload) = engine.refresh(&p.session_token).await?;
    Ok(json!({
        "access_token": access_token,
        "expires_at": payload.exp,
    }))
}

async fn logout(engine: &AuthEngine, params: serde_json::Value) -> CallResult {
    let p: SessionTokenParams = decode(params)?;
    engine.logout(&p.session_token).await?;
    Ok(json!({}))
}

async fn me(engine: &AuthEngine, payload: &AccessTokenPayload) -> CallResult {
    let (identity, profile) = engine.get_profile(payload.user_id).await?;
    Ok(json!({
        "id": identity.id,
        "email": identity.email,
        "role": identity.role,
        "profile": profile,
    }))
}

async fn update_profile(
    engine: &AuthEngine,
    payload: &AccessTokenPayload,
    params: serde_json::Value,
) -> CallResult {
    let input: ProfileInput = decode(params)?;
    engine.update_profile(payload.user_id, input).await?;
    Ok(json!({}))
}

async fn change_password(
    engine: &AuthEngine,
    payload: &AccessTokenPayload,
    params: serde_json::Value,
) -> CallResult {
    let p: ChangePasswordParams = decode(params)?;
    engine
        .change_password(payload.user_id, &p.old_password, &p.new_password)
        .await?;
    Ok(json!({}))
}

async fn upload_photo(
    engine: &AuthEngine,
    payload: &AccessTokenPayload,
    params: serde_json::Value,
) -> CallResult {
    let p: UploadPhotoParams = decode(params)?;
    let bytes = BASE64
        .decode(p.photo_data.as_bytes())
        .map_err(|_| AuthError::Validation("photo_data is not valid base64".into()))?;
    let (photo_path, thumbnail_path) =
        engine.upload_photo(payload.user_id, &bytes, &p.ext).await?;
    Ok(json!({
        "photo_path": photo_path,
        "thumbnail_path": thumbnail_path,
    }))
}
