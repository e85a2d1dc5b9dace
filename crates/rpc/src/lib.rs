//! Remote-procedure transport for the Agora auth service.
//!
//! Serves the same auth engine as the HTTP API over newline-delimited
//! JSON-RPC 2.0 on a plain TCP listener. Each request envelope carries an
//! optional `metadata` map; protected methods require a
//! `metadata["authorization"]` entry holding the same `Bearer <token>` value
//! the HTTP transport takes in its `Authorization` header, verified by the
//! shared guard algorithm in `agora-core`.

pub mod methods;
pub mod server;
pub mod types;

pub use server::serve;
