//! Shared bearer-credential guard algorithm.
//!
//! Both transports gate protected calls with the same logic: extract the
//! bearer token from the transport's carrier (the `Authorization` header on
//! HTTP, the `authorization` metadata entry on RPC), verify it with the
//! codec, and hand the payload to the protected operation. The guard is a
//! pure filter: no state, no I/O beyond the codec call, and it fails closed
//! with [`AuthError::Unauthenticated`] on every rejection so callers cannot
//! distinguish a missing header from a bad or expired token.

use crate::error::AuthError;
use crate::token::{AccessTokenPayload, TokenCodec};

/// Parse a carrier value of the form `Bearer <token>`.
///
/// Exactly two whitespace-separated fields are required and the scheme is
/// matched case-insensitively; anything else is `Unauthenticated`.
pub fn bearer_token(carrier: &str) -> Result<&str, AuthError> {
    let mut fields = carrier.split_whitespace();
    let (scheme, token) = match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::Unauthenticated),
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Unauthenticated);
    }
    Ok(token)
}

/// Run the full guard: carrier extraction plus token verification.
///
/// `carrier` is the raw header/metadata value if the transport found one.
pub fn authenticate(
    codec: &TokenCodec,
    carrier: Option<&str>,
) -> Result<AccessTokenPayload, AuthError> {
    let token = bearer_token(carrier.ok_or(AuthError::Unauthenticated)?)?;
    codec.verify(token).map_err(|_| AuthError::Unauthenticated)
}
