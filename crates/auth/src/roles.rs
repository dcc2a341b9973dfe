use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotdesk_core::RoleId;

/// Role key used for RBAC.
///
/// Keys are opaque short strings (e.g. "admin", "sales_manager"); the one
/// key with built-in meaning is [`RoleKey::SUPER_ADMIN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleKey(Cow<'static, str>);

impl RoleKey {
    /// Protected sentinel role: never deletable, and users/roles owned by it
    /// can only be modified by another super admin.
    pub const SUPER_ADMIN: RoleKey = RoleKey(Cow::Borrowed("super_admin"));

    pub const ADMIN: RoleKey = RoleKey(Cow::Borrowed("admin"));

    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_super_admin(&self) -> bool {
        self.as_str() == Self::SUPER_ADMIN.as_str()
    }
}

impl core::fmt::Display for RoleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role row status (soft delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    #[default]
    Active,
    Deleted,
}

/// A role row from the role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub key: RoleKey,
    pub description: Option<String>,
    pub status: RoleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active
    }
}
