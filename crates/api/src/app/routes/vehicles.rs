//! Representative permission-gated resource route.
//!
//! Listing is gated by the `vehicle.list` api permission rather than a role
//! set; the rest of the vehicle module follows the same shape.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use lotdesk_auth::PermissionKey;

use crate::app::services::AppServices;
use crate::authz;
use crate::context::ClaimsContext;

/// GET /vehicles - vehicle read model, requires `vehicle.list`.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ClaimsContext>,
) -> axum::response::Response {
    if let Err(resp) =
        authz::require_permission(&services, ctx.claims(), &PermissionKey::new("vehicle.list"))
    {
        return resp;
    }

    (
        StatusCode::OK,
        Json(json!({ "vehicles": services.vehicles })),
    )
        .into_response()
}
