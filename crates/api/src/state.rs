use std::sync::Arc;

use agora_core::engine::AuthEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The transport-agnostic auth engine, shared with the RPC server.
    pub engine: Arc<AuthEngine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database connection pool; `None` when the engine runs on
    /// non-database stores.
    pub pool: Option<agora_db::DbPool>,
}
