//! `lotdesk-auth` — authentication/authorization core (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage: the token
//! codec, permission tree resolver, guard and session manager live here;
//! transports and stores plug in through the trait seams in [`store`],
//! [`password`] and [`audit`].

pub mod admin;
pub mod audit;
pub mod claims;
pub mod guard;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod store;
pub mod token;
pub mod tree;

pub use audit::{AuditEvent, AuditSink, TracingAuditSink};
pub use claims::{ClaimsValidationError, IdentityClaims, validate_claims};
pub use guard::{authenticate, authorize_permission, authorize_role};
pub use password::{Argon2Verifier, PasswordVerifier, hash_password};
pub use permissions::{Permission, PermissionKey, PermissionKind, PermissionStatus};
pub use roles::{Role, RoleKey, RoleStatus};
pub use session::{IssuedSession, SessionManager, session_ttl};
pub use store::{
    CredentialRecord, CredentialStore, PermissionRepository, RoleStore, StoreError, UserAccount,
};
pub use token::{SignedToken, TokenCodec, TokenError};
pub use tree::{
    GrantScope, PermissionNode, build_membership, build_menu_tree, flatten_for_membership,
    resolve_granted_permissions,
};
