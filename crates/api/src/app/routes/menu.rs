//! Navigation menu for the caller's role.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use lotdesk_auth::build_menu_tree;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::ClaimsContext;

/// GET /menu - hierarchical menu tree scoped to the caller's grants.
pub async fn menu(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
) -> axum::response::Response {
    let scope = match authz::grant_scope_for(&services, ctx.claims()) {
        Ok(scope) => scope,
        Err(resp) => return resp,
    };

    let catalog = match services.permissions.catalog() {
        Ok(catalog) => catalog,
        Err(e) => return errors::store_error_to_response(e),
    };

    let tree = build_menu_tree(&catalog, &scope);

    (StatusCode::OK, Json(json!({ "menu": tree }))).into_response()
}
