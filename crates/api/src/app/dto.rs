//! Request/response DTOs and JSON mapping helpers.

use serde::{Deserialize, Serialize};

use lotdesk_auth::IdentityClaims;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Login body. Fields are optional so missing input surfaces as a 400
/// validation error rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub remember: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: Option<String>,
    pub key: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GrantPermissionRequest {
    pub permission_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetUserRoleRequest {
    pub role_id: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: String,
    pub username: String,
    pub role: String,
}

pub fn user_body(claims: &IdentityClaims) -> UserBody {
    UserBody {
        id: claims.sub.to_string(),
        username: claims.username.clone(),
        role: claims.role.as_str().to_string(),
    }
}

/// Read-model row for the demo vehicle listing.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub id: i64,
    pub vin: String,
    pub model: String,
    pub year: i32,
    pub status: String,
    pub asking_price: i64,
}
