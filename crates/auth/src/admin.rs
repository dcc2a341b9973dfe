//! Protection policy for the role/user admin surface.
//!
//! # Invariants
//! - The `super_admin` role can never be deleted.
//! - A non-super-admin actor can never modify a super-admin-owned user or
//!   role, and can never hand out the `super_admin` role.
//!
//! These are pure checks; the admin routes call them before touching any
//! store, so payload content cannot route around them.

use lotdesk_core::{AuthError, AuthResult};

use crate::roles::{Role, RoleKey};

/// A role row may be deleted unless it is the protected sentinel.
pub fn ensure_role_deletable(role: &Role) -> AuthResult<()> {
    if role.key.is_super_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

/// An actor may modify a user/role owned by `target_role` unless the target
/// is super-admin-owned and the actor is not a super admin.
pub fn ensure_actor_may_modify(actor_role: &RoleKey, target_role: &RoleKey) -> AuthResult<()> {
    if target_role.is_super_admin() && !actor_role.is_super_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

/// An actor may assign `new_role` unless that would mint a super admin
/// without being one.
pub fn ensure_assignable(actor_role: &RoleKey, new_role: &RoleKey) -> AuthResult<()> {
    if new_role.is_super_admin() && !actor_role.is_super_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}
