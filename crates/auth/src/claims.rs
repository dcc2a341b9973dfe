use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lotdesk_core::UserId;

use crate::RoleKey;

/// Identity claims embedded in a session token.
///
/// Once signed these are immutable: any mutation invalidates the signature.
/// Field names follow JWT conventions so the payload is self-describing to
/// standard tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject: the user identifier.
    pub sub: UserId,

    /// Login name of the user.
    pub username: String,

    /// Role key granted at issue time.
    pub role: RoleKey,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiry (unix seconds). Exclusive: a token evaluated at exactly `exp`
    /// is already expired.
    pub exp: i64,
}

impl IdentityClaims {
    /// Build claims for an issue at `now` with the given time-to-live.
    pub fn new(
        sub: UserId,
        username: impl Into<String>,
        role: RoleKey,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            sub,
            username: username.into(),
            role,
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsValidationError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// Note: this validates the *claims* only; signature verification happens in
/// the token codec before this runs.
pub fn validate_claims(
    claims: &IdentityClaims,
    now: DateTime<Utc>,
) -> Result<(), ClaimsValidationError> {
    if claims.exp <= claims.iat {
        return Err(ClaimsValidationError::InvalidTimeWindow);
    }
    if now.timestamp() >= claims.exp {
        return Err(ClaimsValidationError::Expired);
    }
    Ok(())
}
