//! Signed session token codec.
//!
//! Issues and verifies the compact, expiring credential the client holds.
//! The signing secret is injected once at construction and never re-read.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claims::{ClaimsValidationError, IdentityClaims, validate_claims};

/// A signed, base-encoded token. Opaque to the client; only the issuing
/// process can produce a valid signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not match the claims under the process secret.
    #[error("token signature mismatch")]
    InvalidSignature,

    /// Current time is at or past the embedded expiry.
    #[error("token expired")]
    Expired,

    /// Token could not be decoded at all.
    #[error("malformed token")]
    Malformed,
}

impl From<ClaimsValidationError> for TokenError {
    fn from(value: ClaimsValidationError) -> Self {
        match value {
            ClaimsValidationError::Expired => TokenError::Expired,
            ClaimsValidationError::InvalidTimeWindow => TokenError::Malformed,
        }
    }
}

/// HMAC-SHA-256 token codec.
///
/// Holds no mutable state; one instance is built at startup from the
/// environment-provided secret and shared across requests.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        if secret.len() < 32 {
            tracing::warn!(
                len = secret.len(),
                "signing secret is shorter than the recommended 32 bytes"
            );
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` with exclusive-boundary
        // semantics; the library check (inclusive, with leeway) stays off.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign the claims into a compact token.
    pub fn issue(&self, claims: &IdentityClaims) -> Result<SignedToken, TokenError> {
        let raw = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|_| TokenError::Malformed)?;
        Ok(SignedToken(raw))
    }

    /// Verify signature and expiry, returning the embedded claims unmodified.
    ///
    /// Binary outcome: any failure rejects the whole token.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, TokenError> {
        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
