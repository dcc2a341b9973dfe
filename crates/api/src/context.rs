use lotdesk_auth::{IdentityClaims, RoleKey};

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware; immutable for the request's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsContext {
    claims: IdentityClaims,
}

impl ClaimsContext {
    pub fn new(claims: IdentityClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    pub fn role(&self) -> &RoleKey {
        &self.claims.role
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }
}
