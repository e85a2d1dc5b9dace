//! JSON-RPC envelope types and error-code mapping.

use std::collections::HashMap;

use agora_core::error::AuthError;
use serde::{Deserialize, Serialize};

// Standard JSON-RPC codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

// Domain codes, in the implementation-defined server range.
pub const UNAUTHENTICATED: i32 = -32000;
pub const INVALID_CREDENTIALS: i32 = -32001;
pub const SESSION_NOT_FOUND: i32 = -32002;
pub const VALIDATION_ERROR: i32 = -32003;
pub const USER_NOT_FOUND: i32 = -32004;
pub const INTERNAL_ERROR: i32 = -32005;

/// Inbound request envelope.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Echoed back verbatim; a missing id still gets a response on this
    /// transport (no notification semantics for auth calls).
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    /// Transport metadata; protected methods read `authorization` from here.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Outbound response envelope.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        RpcResponse {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        RpcResponse {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    /// Map a domain error onto a stable JSON-RPC error code.
    ///
    /// Internal failures are sanitized: the caller sees a fixed message,
    /// the details go to the log.
    pub fn domain_error(id: Option<serde_json::Value>, err: AuthError) -> Self {
        let (code, message) = match &err {
            AuthError::Validation(msg) => (VALIDATION_ERROR, msg.clone()),
            AuthError::InvalidCredentials => (INVALID_CREDENTIALS, err.to_string()),
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::Unauthenticated => {
                (UNAUTHENTICATED, "not authenticated".to_string())
            }
            AuthError::SessionNotFound => (SESSION_NOT_FOUND, err.to_string()),
            AuthError::UserNotFound => (USER_NOT_FOUND, err.to_string()),
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error on rpc call");
                (INTERNAL_ERROR, "internal error".to_string())
            }
        };
        RpcResponse::error(id, code, message)
    }
}
