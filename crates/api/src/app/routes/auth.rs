//! Session routes: login, logout, current identity.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use lotdesk_auth::authenticate;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ClaimsContext;
use crate::cookie;

/// POST /login - verify credentials, set the token cookie.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let Some(username) = body
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "username is required");
    };

    let Some(password) = body.password.as_deref().filter(|s| !s.is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "password is required");
    };

    let remember = body.remember.unwrap_or(false);

    let session = match services.sessions.login(username, password, remember, Utc::now()) {
        Ok(session) => session,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::set_token_cookie(
            session.token.as_str(),
            session.ttl.num_seconds(),
            services.cookie_secure,
        ),
    );

    (
        StatusCode::OK,
        headers,
        Json(json!({ "user": dto::user_body(&session.claims) })),
    )
        .into_response()
}

/// POST /logout - discard the client-held token.
///
/// Works without a valid token (the cookie is cleared either way); a valid
/// one is used for the audit trail only.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let raw = cookie::token_from_headers(&headers);
    let claims = authenticate(raw.as_deref(), &services.codec, Utc::now()).ok();
    services.sessions.logout(claims.as_ref());

    let mut out = HeaderMap::new();
    out.insert(
        header::SET_COOKIE,
        cookie::clear_token_cookie(services.cookie_secure),
    );

    (StatusCode::OK, out, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /me - identity behind the current token.
pub async fn me(Extension(ctx): Extension<ClaimsContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({ "user": dto::user_body(ctx.claims()) })),
    )
        .into_response()
}
