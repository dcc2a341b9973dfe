//! Admin routes for role and grant management.
//!
//! Every handler is gated by the managing role set, and the super-admin
//! protection policy runs before any store write, so payload content cannot
//! route around it.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use lotdesk_auth::{RoleKey, admin};
use lotdesk_core::{PermissionId, RoleId, UserId};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::ClaimsContext;

/// Roles allowed to manage users, roles and grants.
fn managing_roles() -> HashSet<RoleKey> {
    [RoleKey::ADMIN, RoleKey::SUPER_ADMIN].into_iter().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

/// GET /admin/roles - list active roles.
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    match services.roles.list_roles() {
        Ok(roles) => (StatusCode::OK, Json(json!({ "roles": roles }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /admin/roles - create a role.
pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
    Json(body): Json<dto::CreateRoleRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let Some(name) = body.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "name is required");
    };
    let Some(key) = body.key.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "key is required");
    };

    let key = RoleKey::new(key.to_string());
    if let Err(e) = admin::ensure_actor_may_modify(ctx.role(), &key) {
        return errors::auth_error_to_response(e);
    }

    match services
        .roles
        .create_role(name, &key, body.description.as_deref())
    {
        Ok(role) => (StatusCode::CREATED, Json(json!({ "role": role }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// DELETE /admin/roles/:id - soft-delete a role and drop its grants.
pub async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let id = RoleId::new(id);
    let role = match services.roles.find_role(id) {
        Ok(Some(role)) => role,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = admin::ensure_role_deletable(&role) {
        return errors::auth_error_to_response(e);
    }
    if let Err(e) = admin::ensure_actor_may_modify(ctx.role(), &role.key) {
        return errors::auth_error_to_response(e);
    }

    match services.roles.delete_role(id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Permission catalog & grants
// ─────────────────────────────────────────────────────────────────────────────

/// GET /admin/permissions - full catalog.
///
/// Listing order is descending `sort_order` (this listing's historical
/// order; the menu tree sorts ascending).
pub async fn list_permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let mut catalog = match services.permissions.catalog() {
        Ok(catalog) => catalog,
        Err(e) => return errors::store_error_to_response(e),
    };
    catalog.sort_by(|a, b| b.sort_order.cmp(&a.sort_order).then(a.id.cmp(&b.id)));

    (StatusCode::OK, Json(json!({ "permissions": catalog }))).into_response()
}

/// POST /admin/roles/:id/permissions - grant a permission to a role.
pub async fn grant_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::GrantPermissionRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let id = RoleId::new(id);
    let role = match services.roles.find_role(id) {
        Ok(Some(role)) => role,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = admin::ensure_actor_may_modify(ctx.role(), &role.key) {
        return errors::auth_error_to_response(e);
    }

    match services
        .roles
        .grant_permission(id, PermissionId::new(body.permission_id))
    {
        Ok(granted) => (StatusCode::OK, Json(json!({ "granted": granted }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// DELETE /admin/roles/:id/permissions/:pid - revoke a grant.
pub async fn revoke_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
    Path((id, pid)): Path<(i64, i64)>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let id = RoleId::new(id);
    let role = match services.roles.find_role(id) {
        Ok(Some(role)) => role,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = admin::ensure_actor_may_modify(ctx.role(), &role.key) {
        return errors::auth_error_to_response(e);
    }

    match services
        .roles
        .revoke_permission(id, PermissionId::new(pid))
    {
        Ok(revoked) => (StatusCode::OK, Json(json!({ "revoked": revoked }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// PUT /admin/users/:id/role - reassign a user's role.
pub async fn set_user_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetUserRoleRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_role(&services, ctx.claims(), &managing_roles()) {
        return resp;
    }

    let user_id = match UserId::from_str(&id) {
        Ok(user_id) => user_id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id");
        }
    };

    let user = match services.roles.find_user(user_id) {
        Ok(Some(user)) => user,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    // A non-super-admin actor can never touch a super-admin-owned user.
    if let Err(e) = admin::ensure_actor_may_modify(ctx.role(), &user.role_key) {
        return errors::auth_error_to_response(e);
    }

    let role_id = RoleId::new(body.role_id);
    let role = match services.roles.find_role(role_id) {
        Ok(Some(role)) => role,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = admin::ensure_assignable(ctx.role(), &role.key) {
        return errors::auth_error_to_response(e);
    }

    match services.roles.set_user_role(user_id, role_id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
