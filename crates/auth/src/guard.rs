//! Request-time authorization guard.
//!
//! One linear pipeline per request (extract, verify, authorize) with no
//! retries and no state. Every protected operation goes through exactly one
//! of [`authorize_role`] or [`authorize_permission`]; handlers never
//! hand-roll role comparisons.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use lotdesk_core::{AuthError, AuthResult};

use crate::claims::IdentityClaims;
use crate::permissions::PermissionKey;
use crate::roles::RoleKey;
use crate::token::TokenCodec;

/// Verify the raw credential extracted from the transport.
///
/// Absence and every codec failure collapse to `Unauthenticated`: the caller
/// must not learn whether the token was missing, forged or merely stale.
/// The distinguishing kind is kept for internal logs only.
pub fn authenticate(
    raw: Option<&str>,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> AuthResult<IdentityClaims> {
    let token = raw.filter(|t| !t.is_empty()).ok_or(AuthError::Unauthenticated)?;

    codec.verify(token, now).map_err(|kind| {
        tracing::debug!(%kind, "token rejected");
        AuthError::Unauthenticated
    })
}

/// Coarse endpoint gating by role set.
pub fn authorize_role(claims: &IdentityClaims, allowed: &HashSet<RoleKey>) -> AuthResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Fine-grained gating by permission key.
///
/// `membership` is the role's resolved key set (see
/// [`crate::tree::build_membership`]); no repository round trip happens per
/// check.
pub fn authorize_permission(
    claims: &IdentityClaims,
    required: &PermissionKey,
    membership: &HashSet<PermissionKey>,
) -> AuthResult<()> {
    if membership.contains(required) {
        Ok(())
    } else {
        tracing::debug!(user = %claims.username, %required, "permission check failed");
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lotdesk_core::UserId;

    fn claims(role: &str) -> IdentityClaims {
        IdentityClaims::new(
            UserId::new(),
            "someone",
            RoleKey::new(role.to_string()),
            Utc::now(),
            Duration::days(1),
        )
    }

    fn roleset(keys: &[&str]) -> HashSet<RoleKey> {
        keys.iter().map(|k| RoleKey::new(k.to_string())).collect()
    }

    #[test]
    fn authenticate_rejects_missing_token() {
        let codec = TokenCodec::new(b"guard-test-secret-guard-test-secret");
        assert_eq!(
            authenticate(None, &codec, Utc::now()),
            Err(AuthError::Unauthenticated)
        );
        assert_eq!(
            authenticate(Some(""), &codec, Utc::now()),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn authenticate_normalizes_codec_failures() {
        let codec = TokenCodec::new(b"guard-test-secret-guard-test-secret");
        let now = Utc::now();

        // Garbage and expired both collapse to Unauthenticated.
        assert_eq!(
            authenticate(Some("junk"), &codec, now),
            Err(AuthError::Unauthenticated)
        );

        let stale = claims("admin");
        let token = codec.issue(&stale).unwrap();
        let later = now + Duration::days(2);
        assert_eq!(
            authenticate(Some(token.as_str()), &codec, later),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn authenticate_returns_claims_for_valid_token() {
        let codec = TokenCodec::new(b"guard-test-secret-guard-test-secret");
        let issued = claims("sales");
        let token = codec.issue(&issued).unwrap();

        let got = authenticate(Some(token.as_str()), &codec, Utc::now()).unwrap();
        assert_eq!(got, issued);
    }

    #[test]
    fn role_in_allowed_set_passes() {
        let c = claims("admin");
        assert!(authorize_role(&c, &roleset(&["admin", "super_admin"])).is_ok());
    }

    #[test]
    fn role_outside_allowed_set_is_forbidden() {
        let c = claims("sales");
        assert_eq!(
            authorize_role(&c, &roleset(&["admin", "super_admin"])),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn empty_role_set_always_rejects() {
        for role in ["admin", "super_admin", "sales"] {
            assert_eq!(
                authorize_role(&claims(role), &HashSet::new()),
                Err(AuthError::Forbidden)
            );
        }
    }

    #[test]
    fn universal_role_set_always_accepts() {
        let universe = roleset(&["admin", "super_admin", "sales", "appraiser"]);
        for role in ["admin", "super_admin", "sales", "appraiser"] {
            assert!(authorize_role(&claims(role), &universe).is_ok());
        }
    }

    #[test]
    fn permission_membership_gates_access() {
        let c = claims("sales");
        let membership: HashSet<PermissionKey> = [
            PermissionKey::new("vehicle.list"),
            PermissionKey::new("vehicle.archive"),
        ]
        .into_iter()
        .collect();

        assert!(authorize_permission(&c, &PermissionKey::new("vehicle.list"), &membership).is_ok());
        assert_eq!(
            authorize_permission(&c, &PermissionKey::new("vehicle.purge"), &membership),
            Err(AuthError::Forbidden)
        );
    }
}
