use std::sync::Arc;

use axum::{
    extract::State,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use lotdesk_auth::{TokenCodec, authenticate};

use crate::app::errors;
use crate::context::ClaimsContext;
use crate::cookie;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
}

/// Gate for the protected subtree: extract → verify → attach claims.
///
/// Any failure short-circuits to 401; the response does not reveal whether
/// the token was missing, forged or expired.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let raw = cookie::token_from_headers(req.headers());

    let claims = authenticate(raw.as_deref(), &state.codec, Utc::now())
        .map_err(errors::auth_error_to_response)?;

    req.extensions_mut().insert(ClaimsContext::new(claims));

    Ok(next.run(req).await)
}
