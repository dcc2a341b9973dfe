//! API-side authorization enforcement.
//!
//! Every protected handler funnels through exactly one of [`require_role`]
//! or [`require_permission`]; no handler compares role strings inline.

use std::collections::HashSet;

use axum::response::Response;

use lotdesk_auth::{
    AuditEvent, GrantScope, IdentityClaims, PermissionKey, RoleKey, authorize_permission,
    authorize_role, build_membership, resolve_granted_permissions,
};

use crate::app::{errors, services::AppServices};

/// Coarse role-set gate.
pub fn require_role(
    services: &AppServices,
    claims: &IdentityClaims,
    allowed: &HashSet<RoleKey>,
) -> Result<(), Response> {
    authorize_role(claims, allowed).map_err(|e| {
        services.audit.record(AuditEvent::AccessDenied {
            username: claims.username.clone(),
            role: claims.role.clone(),
            required: format!("role in {:?}", allowed.iter().map(RoleKey::as_str).collect::<Vec<_>>()),
        });
        errors::auth_error_to_response(e)
    })
}

/// Fine-grained permission-key gate.
///
/// Resolves the caller's membership set once (catalog fetched once, tree
/// built in memory) and checks the key against it. Repository failure
/// denies the request.
pub fn require_permission(
    services: &AppServices,
    claims: &IdentityClaims,
    required: &PermissionKey,
) -> Result<(), Response> {
    let scope = grant_scope_for(services, claims)?;
    let catalog = services
        .permissions
        .catalog()
        .map_err(errors::store_error_to_response)?;
    let membership = build_membership(&catalog, &scope);

    authorize_permission(claims, required, &membership).map_err(|e| {
        services.audit.record(AuditEvent::AccessDenied {
            username: claims.username.clone(),
            role: claims.role.clone(),
            required: required.as_str().to_string(),
        });
        errors::auth_error_to_response(e)
    })
}

/// Grant scope for a caller.
///
/// Super admins see the full catalog; that decision lives here at the
/// call-site boundary, so the resolver itself stays policy-free. A role key that no
/// longer resolves to an active role yields an empty grant set.
pub fn grant_scope_for(
    services: &AppServices,
    claims: &IdentityClaims,
) -> Result<GrantScope, Response> {
    if claims.role.is_super_admin() {
        return Ok(GrantScope::FullCatalog);
    }

    let role = services
        .permissions
        .role_by_key(&claims.role)
        .map_err(errors::store_error_to_response)?;

    let granted = match role {
        Some(role) => resolve_granted_permissions(services.permissions.as_ref(), role.id)
            .map_err(errors::auth_error_to_response)?,
        None => HashSet::new(),
    };

    Ok(GrantScope::Granted(granted))
}
