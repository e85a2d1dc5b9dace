//! Symmetric authenticated-encryption access tokens.
//!
//! The wire format follows the PASETO v2-local shape: a `v2.local.` prefix
//! followed by the url-safe base64 of `nonce || ciphertext`, where the
//! ciphertext is the AES-256-GCM encryption of the payload JSON. There are
//! no unauthenticated fields; decoding requires the same static 32-byte key
//! used to mint. Key rotation is out of scope -- the codec holds one key for
//! its entire lifetime.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::types::{SubjectId, Timestamp};

/// Required symmetric key length in bytes.
pub const KEY_SIZE: usize = 32;

/// AES-256-GCM nonce length in bytes (96 bits).
const NONCE_SIZE: usize = 12;

/// Token header, checked on verify before any crypto work.
const PREFIX: &str = "v2.local.";

/// The claims carried inside every access token.
///
/// Never persisted: it exists only inside the encrypted token string and in
/// the verifier's return value, and is immutable once minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenPayload {
    /// Unique token id, for traceability.
    pub id: Uuid,
    /// The authenticated subject.
    pub user_id: SubjectId,
    /// Issued-at (RFC3339 on the wire).
    pub iat: Timestamp,
    /// Expires-at (RFC3339 on the wire). Strictly `iat + ttl`; never
    /// extended in place.
    pub exp: Timestamp,
}

impl AccessTokenPayload {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.exp
    }
}

/// Stateless mint/verify codec over one process-wide symmetric key.
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from a 32-byte symmetric key.
    ///
    /// A wrong-size key fails here, at construction time; `mint` and
    /// `verify` cannot fail on key problems afterwards.
    pub fn new(key: &[u8]) -> Result<Self, AuthError> {
        if key.len() != KEY_SIZE {
            return Err(AuthError::Validation(format!(
                "token key must be exactly {KEY_SIZE} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| AuthError::internal("token cipher init", e))?;
        Ok(TokenCodec { cipher })
    }

    /// Mint a token for `subject_id` with the given ttl.
    ///
    /// A negative ttl is allowed and produces an already-expired token;
    /// expiry is enforced by `verify`, not here.
    pub fn mint(
        &self,
        subject_id: SubjectId,
        ttl: chrono::Duration,
    ) -> Result<(String, AccessTokenPayload), AuthError> {
        let now = Utc::now();
        let payload = AccessTokenPayload {
            id: Uuid::new_v4(),
            user_id: subject_id,
            iat: now,
            exp: now + ttl,
        };

        let plaintext = serde_json::to_vec(&payload)
            .map_err(|e| AuthError::internal("token payload encode", e))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|e| AuthError::internal("token encrypt", e))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok((format!("{PREFIX}{}", URL_SAFE_NO_PAD.encode(combined)), payload))
    }

    /// Decrypt and authenticate a token string.
    ///
    /// Callers see exactly one of two error kinds: [`AuthError::InvalidToken`]
    /// for anything that fails to decode or authenticate (without revealing
    /// which step failed), and [`AuthError::ExpiredToken`] when the payload
    /// authenticated but is past its expiry.
    pub fn verify(&self, token: &str) -> Result<AccessTokenPayload, AuthError> {
        let encoded = token.strip_prefix(PREFIX).ok_or(AuthError::InvalidToken)?;

        let combined = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AuthError::InvalidToken)?;
        if combined.len() < NONCE_SIZE {
            return Err(AuthError::InvalidToken);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload: AccessTokenPayload =
            serde_json::from_slice(&plaintext).map_err(|_| AuthError::InvalidToken)?;

        if payload.is_expired(Utc::now()) {
            return Err(AuthError::ExpiredToken);
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(b"0123456789abcdef0123456789abcdef").expect("32-byte key")
    }

    #[test]
    fn rejects_wrong_key_size_at_construction() {
        assert_matches!(TokenCodec::new(b"too-short"), Err(AuthError::Validation(_)));
        assert_matches!(TokenCodec::new(&[0u8; 33]), Err(AuthError::Validation(_)));
    }

    #[test]
    fn mint_verify_round_trip() {
        let codec = test_codec();
        let subject = Uuid::new_v4();

        let (token, minted) = codec.mint(subject, chrono::Duration::minutes(15)).unwrap();
        assert!(token.starts_with("v2.local."));

        let verified = codec.verify(&token).expect("fresh token must verify");
        assert_eq!(verified, minted);
        assert_eq!(verified.user_id, subject);
        assert!(verified.exp > verified.iat);
    }

    #[test]
    fn expired_token_reports_expired_not_invalid() {
        let codec = test_codec();
        let (token, _) = codec
            .mint(Uuid::new_v4(), chrono::Duration::seconds(-1))
            .unwrap();
        assert_matches!(codec.verify(&token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let codec = test_codec();
        let (token, _) = codec.mint(Uuid::new_v4(), chrono::Duration::minutes(5)).unwrap();

        // Flip the last ciphertext character; authentication must fail.
        let mut bytes = token.into_bytes();
        let last = *bytes.last().unwrap();
        *bytes.last_mut().unwrap() = if last == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_matches!(codec.verify(&tampered), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_inputs_are_invalid() {
        let codec = test_codec();
        for junk in ["", "v2.local.", "v2.local.!!!", "v1.local.abc", "not-a-token"] {
            assert_matches!(codec.verify(junk), Err(AuthError::InvalidToken), "input: {junk:?}");
        }
    }

    #[test]
    fn different_key_cannot_verify() {
        let codec_a = test_codec();
        let codec_b = TokenCodec::new(b"ffffffffffffffffffffffffffffffff").unwrap();

        let (token, _) = codec_a.mint(Uuid::new_v4(), chrono::Duration::minutes(5)).unwrap();
        assert_matches!(codec_b.verify(&token), Err(AuthError::InvalidToken));
    }
}
