//! Authorization error model.

use thiserror::Error;

/// Result type used across the authorization core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Authorization-core error taxonomy.
///
/// Keep this focused on request-outcome failures (credential rejection,
/// missing identity, insufficient rights). Collaborator plumbing failures
/// are folded into `RepositoryUnavailable` so callers fail closed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login failed. Deliberately non-specific: the caller must not learn
    /// whether the login name or the password was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No usable identity on the request. Token missing, malformed,
    /// bad signature and expired all normalize to this one outcome.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Valid identity, insufficient role or permission.
    #[error("forbidden")]
    Forbidden,

    /// Malformed request shape, rejected before the core is invoked.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A collaborator (credential store, permission repository) could not
    /// be reached. Always a denial, never a default grant.
    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn repository_unavailable(msg: impl Into<String>) -> Self {
        Self::RepositoryUnavailable(msg.into())
    }
}
