//! Collaborator seams for persistent state.
//!
//! The core never owns storage: credentials, the permission catalog and the
//! role table live behind these traits, injected at wiring time. Every
//! failure surfaces as [`StoreError`] and is mapped to a denial upstream.

use std::collections::HashSet;

use thiserror::Error;

use lotdesk_core::{PermissionId, RoleId, UserId};

use crate::{Permission, Role, RoleKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// A user record as the credential store exposes it for login.
///
/// The password hash is opaque here; only the [`crate::PasswordVerifier`]
/// collaborator interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role_id: RoleId,
    pub role_key: RoleKey,
}

/// A user row as the admin surface sees it (no secrets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user_id: UserId,
    pub username: String,
    pub role_id: RoleId,
    pub role_key: RoleKey,
}

/// Looks up a user record by login name.
pub trait CredentialStore: Send + Sync {
    fn find_by_login(&self, login: &str) -> Result<Option<CredentialRecord>, StoreError>;
}

/// Read side of the permission/role tables used during authorization.
pub trait PermissionRepository: Send + Sync {
    /// Permission ids granted to a role. An unknown role or a role without
    /// grants yields an empty set.
    fn permission_ids_for_role(&self, role: RoleId) -> Result<HashSet<PermissionId>, StoreError>;

    /// The full permission catalog.
    fn catalog(&self) -> Result<Vec<Permission>, StoreError>;

    /// Resolve an active role row by its key.
    fn role_by_key(&self, key: &RoleKey) -> Result<Option<Role>, StoreError>;
}

/// Write side of the role/user tables used by the admin surface.
pub trait RoleStore: Send + Sync {
    fn list_roles(&self) -> Result<Vec<Role>, StoreError>;

    fn find_role(&self, id: RoleId) -> Result<Option<Role>, StoreError>;

    fn create_role(
        &self,
        name: &str,
        key: &RoleKey,
        description: Option<&str>,
    ) -> Result<Role, StoreError>;

    /// Soft-delete a role and drop its permission links.
    fn delete_role(&self, id: RoleId) -> Result<(), StoreError>;

    /// Returns `false` when the link already existed.
    fn grant_permission(&self, role: RoleId, permission: PermissionId) -> Result<bool, StoreError>;

    /// Returns `false` when there was no link to remove.
    fn revoke_permission(&self, role: RoleId, permission: PermissionId)
    -> Result<bool, StoreError>;

    fn find_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError>;

    fn set_user_role(&self, user: UserId, role: RoleId) -> Result<(), StoreError>;
}
