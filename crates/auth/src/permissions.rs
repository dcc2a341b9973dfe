use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotdesk_core::PermissionId;

/// Permission key.
///
/// Permissions are modeled as opaque strings (e.g. "vehicle.archive",
/// "report.revenue"). Keys are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionKey(Cow<'static, str>);

impl PermissionKey {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a permission row.
///
/// The catalog recognizes `menu`, `button` and `api`. Anything else is
/// carried through as [`PermissionKind::Other`]: a plain catalog entry that
/// never appears in menus and never grants access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionKind {
    Menu,
    Button,
    Api,
    Other(String),
}

impl PermissionKind {
    pub fn as_str(&self) -> &str {
        match self {
            PermissionKind::Menu => "menu",
            PermissionKind::Button => "button",
            PermissionKind::Api => "api",
            PermissionKind::Other(s) => s,
        }
    }

    /// Kinds that participate in `authorize_permission` membership.
    pub fn is_authorizable(&self) -> bool {
        matches!(
            self,
            PermissionKind::Menu | PermissionKind::Button | PermissionKind::Api
        )
    }
}

impl From<String> for PermissionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "menu" => PermissionKind::Menu,
            "button" => PermissionKind::Button,
            "api" => PermissionKind::Api,
            _ => PermissionKind::Other(value),
        }
    }
}

impl From<PermissionKind> for String {
    fn from(value: PermissionKind) -> Self {
        value.as_str().to_string()
    }
}

/// Permission row status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    Enabled,
    Disabled,
}

/// A permission row from the catalog.
///
/// `parent_id` is a self-reference forming a forest; source data is assumed
/// acyclic, and a `parent_id` pointing at no existing row is clamped to a
/// root during tree resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub parent_id: Option<PermissionId>,
    pub name: String,
    pub key: PermissionKey,
    pub kind: PermissionKind,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub status: PermissionStatus,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn is_enabled(&self) -> bool {
        self.status == PermissionStatus::Enabled
    }

    pub fn is_menu(&self) -> bool {
        self.kind == PermissionKind::Menu
    }
}
