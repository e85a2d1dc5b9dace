//! Transport-agnostic authentication domain for the Agora backend.
//!
//! Everything a transport (HTTP or RPC) needs to authenticate callers lives
//! here: the error taxonomy, the token codec, password hashing, the store
//! contracts, the auth engine that orchestrates them, and the shared bearer
//! guard algorithm both transports instantiate.

pub mod engine;
pub mod error;
pub mod guard;
pub mod identity;
pub mod memory;
pub mod password;
pub mod session;
pub mod store;
pub mod token;
pub mod types;
