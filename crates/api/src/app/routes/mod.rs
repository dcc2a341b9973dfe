use axum::{Router, routing::get, routing::put};

pub mod admin;
pub mod auth;
pub mod menu;
pub mod system;
pub mod vehicles;

/// Routes behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(auth::me))
        .route("/menu", get(menu::menu))
        .route("/vehicles", get(vehicles::list))
        .nest("/admin", admin_router())
}

fn admin_router() -> Router {
    Router::new()
        .route("/roles", get(admin::list_roles).post(admin::create_role))
        .route("/roles/:id", axum::routing::delete(admin::delete_role))
        .route("/permissions", get(admin::list_permissions))
        .route("/roles/:id/permissions", axum::routing::post(admin::grant_permission))
        .route(
            "/roles/:id/permissions/:pid",
            axum::routing::delete(admin::revoke_permission),
        )
        .route("/users/:id/role", put(admin::set_user_role))
}
