//! Permission tree resolution.
//!
//! Converts the flat, self-referencing permission catalog into an ordered
//! forest filtered to a caller's granted set, and derives the flat key set
//! backing `authorize_permission`. The catalog is fetched once per
//! resolution and assembled in memory; nothing here talks to the repository
//! more than once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use lotdesk_core::{AuthError, AuthResult, PermissionId, RoleId};

use crate::permissions::{Permission, PermissionKey, PermissionKind};
use crate::store::PermissionRepository;

/// Which permission ids a resolution may include.
///
/// Superuser contexts pass [`GrantScope::FullCatalog`] explicitly at the
/// call site; the resolver itself has no role-key special cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantScope {
    Granted(HashSet<PermissionId>),
    FullCatalog,
}

impl GrantScope {
    fn includes(&self, id: PermissionId) -> bool {
        match self {
            GrantScope::Granted(set) => set.contains(&id),
            GrantScope::FullCatalog => true,
        }
    }
}

/// A resolved node in the permission forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionNode {
    pub id: PermissionId,
    pub name: String,
    pub key: PermissionKey,
    pub kind: PermissionKind,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub children: Vec<PermissionNode>,
}

/// Fetch the permission id set granted to a role.
///
/// Empty grants are an empty set, not an error. Repository failure is a
/// denial: the caller never falls back to a default grant.
pub fn resolve_granted_permissions(
    repo: &dyn PermissionRepository,
    role: RoleId,
) -> AuthResult<HashSet<PermissionId>> {
    repo.permission_ids_for_role(role)
        .map_err(|e| AuthError::repository_unavailable(e.to_string()))
}

/// Build the navigable menu forest for a grant scope.
///
/// Only enabled `menu` rows inside the scope participate. Siblings are
/// ordered by ascending `(sort_order, id)`, deterministic regardless of
/// repository return order. A parent that is disabled (or otherwise
/// filtered out) hides its entire subtree; a `parent_id` that matches no
/// catalog row at all clamps that node to a root.
pub fn build_menu_tree(catalog: &[Permission], scope: &GrantScope) -> Vec<PermissionNode> {
    build_forest(catalog, scope, Permission::is_menu)
}

/// Resolve the flat permission-key membership set for a grant scope.
///
/// This is the lookup behind `authorize_permission`: all enabled,
/// authorizable kinds (menu/button/api) in scope, with the same
/// subtree-pruning rules as the menu tree. Unrecognized kinds never
/// authorize anything.
pub fn build_membership(catalog: &[Permission], scope: &GrantScope) -> HashSet<PermissionKey> {
    let forest = build_forest(catalog, scope, |p| p.kind.is_authorizable());
    flatten_for_membership(&forest)
}

/// Collect every key in a resolved forest.
pub fn flatten_for_membership(nodes: &[PermissionNode]) -> HashSet<PermissionKey> {
    let mut keys = HashSet::new();
    collect_keys(nodes, &mut keys);
    keys
}

fn collect_keys(nodes: &[PermissionNode], out: &mut HashSet<PermissionKey>) {
    for node in nodes {
        out.insert(node.key.clone());
        collect_keys(&node.children, out);
    }
}

fn build_forest(
    catalog: &[Permission],
    scope: &GrantScope,
    include: impl Fn(&Permission) -> bool,
) -> Vec<PermissionNode> {
    // Ids of every row in the catalog, pre-filter: a parent that exists but
    // is filtered out prunes its subtree, while a parent that does not
    // exist at all clamps the child to a root.
    let catalog_ids: HashSet<PermissionId> = catalog.iter().map(|p| p.id).collect();

    let mut by_parent: HashMap<Option<PermissionId>, Vec<&Permission>> = HashMap::new();
    for p in catalog {
        if !p.is_enabled() || !include(p) || !scope.includes(p.id) {
            continue;
        }
        let slot = match p.parent_id {
            Some(parent) if catalog_ids.contains(&parent) => Some(parent),
            _ => None,
        };
        by_parent.entry(slot).or_default().push(p);
    }

    for bucket in by_parent.values_mut() {
        bucket.sort_by_key(|p| (p.sort_order, p.id));
    }

    by_parent
        .get(&None)
        .map(|roots| {
            roots
                .iter()
                .copied()
                .map(|p| attach(p, &by_parent))
                .collect()
        })
        .unwrap_or_default()
}

fn attach(
    permission: &Permission,
    by_parent: &HashMap<Option<PermissionId>, Vec<&Permission>>,
) -> PermissionNode {
    let children = by_parent
        .get(&Some(permission.id))
        .map(|kids| kids.iter().copied().map(|k| attach(k, by_parent)).collect())
        .unwrap_or_default();

    PermissionNode {
        id: permission.id,
        name: permission.name.clone(),
        key: permission.key.clone(),
        kind: permission.kind.clone(),
        path: permission.path.clone(),
        icon: permission.icon.clone(),
        sort_order: permission.sort_order,
        children,
    }
}
