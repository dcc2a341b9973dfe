//! Service wiring: collaborator implementations and shared state.
//!
//! The auth core only sees trait objects; this module provides the
//! in-memory directory backing them (credentials, roles, permission
//! catalog, role-permission links) plus demo seed data for development
//! and the black-box tests.

use std::collections::HashSet;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicI64, Ordering},
};

use chrono::Utc;

use lotdesk_auth::{
    Argon2Verifier, AuditSink, CredentialRecord, CredentialStore, Permission, PermissionKey,
    PermissionKind, PermissionRepository, PermissionStatus, Role, RoleKey, RoleStatus, RoleStore,
    SessionManager, StoreError, TokenCodec, TracingAuditSink, UserAccount, hash_password,
};
use lotdesk_core::{PermissionId, RoleId, UserId};

use crate::app::dto::VehicleSummary;
use crate::config::Config;

// ─────────────────────────────────────────────────────────────────────────────
// AppServices
// ─────────────────────────────────────────────────────────────────────────────

/// Shared per-process services, wired once and handed to the router.
pub struct AppServices {
    pub codec: Arc<TokenCodec>,
    pub sessions: SessionManager,
    pub permissions: Arc<dyn PermissionRepository>,
    pub roles: Arc<dyn RoleStore>,
    pub audit: Arc<dyn AuditSink>,
    pub vehicles: Vec<VehicleSummary>,
    pub cookie_secure: bool,
}

pub fn build_services(config: &Config) -> AppServices {
    let directory = Arc::new(InMemoryDirectory::seeded());
    let codec = Arc::new(TokenCodec::new(config.token_secret.as_bytes()));
    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

    let sessions = SessionManager::new(
        directory.clone(),
        Arc::new(Argon2Verifier),
        codec.clone(),
        audit.clone(),
    );

    AppServices {
        codec,
        sessions,
        permissions: directory.clone(),
        roles: directory,
        audit,
        vehicles: demo_vehicles(),
        cookie_secure: config.cookie_secure,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory directory
// ─────────────────────────────────────────────────────────────────────────────

struct UserRow {
    account: UserAccount,
    password_hash: String,
}

/// In-memory implementation of every store seam.
///
/// Interior locking keeps the directory itself consistent; the auth core
/// only reads during authorization, so each request observes some
/// consistent snapshot.
pub struct InMemoryDirectory {
    users: RwLock<Vec<UserRow>>,
    roles: RwLock<Vec<Role>>,
    links: RwLock<HashSet<(RoleId, PermissionId)>>,
    catalog: RwLock<Vec<Permission>>,
    next_role_id: AtomicI64,
}

fn lock_err<T>(_: T) -> StoreError {
    StoreError::unavailable("directory lock poisoned")
}

impl InMemoryDirectory {
    pub fn empty() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            roles: RwLock::new(Vec::new()),
            links: RwLock::new(HashSet::new()),
            catalog: RwLock::new(Vec::new()),
            next_role_id: AtomicI64::new(1),
        }
    }

    /// Directory with the development seed: three roles, three users
    /// (password `123456`), and a small dealership permission catalog.
    pub fn seeded() -> Self {
        let dir = Self::empty();
        dir.seed();
        dir
    }

    fn seed(&self) {
        let now = Utc::now();

        let role = |id: i64, name: &str, key: RoleKey| Role {
            id: RoleId::new(id),
            name: name.to_string(),
            key,
            description: None,
            status: RoleStatus::Active,
            created_at: now,
            updated_at: now,
        };

        {
            let mut roles = self.roles.write().expect("fresh lock");
            roles.push(role(1, "Super Administrator", RoleKey::SUPER_ADMIN));
            roles.push(role(2, "Administrator", RoleKey::ADMIN));
            roles.push(role(3, "Sales", RoleKey::new("sales")));
        }
        self.next_role_id.store(4, Ordering::SeqCst);

        let perm = |id: i64,
                    parent: Option<i64>,
                    name: &str,
                    key: &str,
                    kind: PermissionKind,
                    path: Option<&str>,
                    sort_order: i32| Permission {
            id: PermissionId::new(id),
            parent_id: parent.map(PermissionId::new),
            name: name.to_string(),
            key: PermissionKey::new(key.to_string()),
            kind,
            path: path.map(str::to_string),
            icon: None,
            sort_order,
            status: PermissionStatus::Enabled,
            created_at: now,
        };

        {
            let mut catalog = self.catalog.write().expect("fresh lock");
            catalog.extend([
                perm(1, None, "Dashboard", "nav.dashboard", PermissionKind::Menu, Some("/dashboard"), 1),
                perm(2, None, "Vehicles", "nav.vehicle", PermissionKind::Menu, Some("/vehicles"), 2),
                perm(3, Some(2), "In Stock", "nav.vehicle.stock", PermissionKind::Menu, Some("/vehicles/stock"), 1),
                perm(4, Some(2), "Archive", "nav.vehicle.archive", PermissionKind::Menu, Some("/vehicles/archive"), 2),
                perm(5, Some(2), "List vehicles", "vehicle.list", PermissionKind::Api, None, 1),
                perm(6, Some(2), "Export vehicles", "vehicle.export", PermissionKind::Button, None, 3),
                perm(7, None, "Finance", "nav.finance", PermissionKind::Menu, Some("/finance"), 3),
                perm(8, Some(7), "Revenue report", "report.revenue", PermissionKind::Api, None, 1),
                perm(9, None, "System", "nav.system", PermissionKind::Menu, Some("/system"), 9),
                perm(10, Some(9), "Roles", "nav.system.role", PermissionKind::Menu, Some("/system/roles"), 1),
                // Legacy row kind carried through untouched; never a menu,
                // never authorizes.
                perm(11, None, "Legacy batch job", "legacy.batch", PermissionKind::Other("action".to_string()), None, 99),
            ]);
        }

        {
            let mut links = self.links.write().expect("fresh lock");
            let admin = RoleId::new(2);
            for pid in [1, 2, 3, 4, 5, 6, 7, 8] {
                links.insert((admin, PermissionId::new(pid)));
            }
            let sales = RoleId::new(3);
            for pid in [1, 2, 3, 5] {
                links.insert((sales, PermissionId::new(pid)));
            }
        }

        let user = |username: &str, role_id: i64, role_key: RoleKey| UserRow {
            account: UserAccount {
                user_id: UserId::new(),
                username: username.to_string(),
                role_id: RoleId::new(role_id),
                role_key,
            },
            password_hash: hash_password("123456").expect("seed hash"),
        };

        let mut users = self.users.write().expect("fresh lock");
        users.push(user("admin", 1, RoleKey::SUPER_ADMIN));
        users.push(user("manager", 2, RoleKey::ADMIN));
        users.push(user("sales", 3, RoleKey::new("sales")));
    }
}

impl CredentialStore for InMemoryDirectory {
    fn find_by_login(&self, login: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users.iter().find(|u| u.account.username == login).map(|u| {
            CredentialRecord {
                user_id: u.account.user_id,
                username: u.account.username.clone(),
                password_hash: u.password_hash.clone(),
                role_id: u.account.role_id,
                role_key: u.account.role_key.clone(),
            }
        }))
    }
}

impl PermissionRepository for InMemoryDirectory {
    fn permission_ids_for_role(&self, role: RoleId) -> Result<HashSet<PermissionId>, StoreError> {
        let links = self.links.read().map_err(lock_err)?;
        Ok(links
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, p)| *p)
            .collect())
    }

    fn catalog(&self) -> Result<Vec<Permission>, StoreError> {
        Ok(self.catalog.read().map_err(lock_err)?.clone())
    }

    fn role_by_key(&self, key: &RoleKey) -> Result<Option<Role>, StoreError> {
        let roles = self.roles.read().map_err(lock_err)?;
        Ok(roles
            .iter()
            .find(|r| r.key == *key && r.status == RoleStatus::Active)
            .cloned())
    }
}

impl RoleStore for InMemoryDirectory {
    fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let roles = self.roles.read().map_err(lock_err)?;
        Ok(roles
            .iter()
            .filter(|r| r.status == RoleStatus::Active)
            .cloned()
            .collect())
    }

    fn find_role(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        let roles = self.roles.read().map_err(lock_err)?;
        Ok(roles
            .iter()
            .find(|r| r.id == id && r.status == RoleStatus::Active)
            .cloned())
    }

    fn create_role(
        &self,
        name: &str,
        key: &RoleKey,
        description: Option<&str>,
    ) -> Result<Role, StoreError> {
        let mut roles = self.roles.write().map_err(lock_err)?;
        if roles
            .iter()
            .any(|r| r.key == *key && r.status == RoleStatus::Active)
        {
            return Err(StoreError::conflict(format!(
                "role key '{}' already exists",
                key
            )));
        }

        let now = Utc::now();
        let role = Role {
            id: RoleId::new(self.next_role_id.fetch_add(1, Ordering::SeqCst)),
            name: name.to_string(),
            key: key.clone(),
            description: description.map(str::to_string),
            status: RoleStatus::Active,
            created_at: now,
            updated_at: now,
        };
        roles.push(role.clone());
        Ok(role)
    }

    fn delete_role(&self, id: RoleId) -> Result<(), StoreError> {
        {
            let mut roles = self.roles.write().map_err(lock_err)?;
            match roles.iter_mut().find(|r| r.id == id) {
                Some(role) => {
                    role.status = RoleStatus::Deleted;
                    role.updated_at = Utc::now();
                }
                None => return Err(StoreError::conflict(format!("role {id} does not exist"))),
            }
        }

        let mut links = self.links.write().map_err(lock_err)?;
        links.retain(|(r, _)| *r != id);
        Ok(())
    }

    fn grant_permission(&self, role: RoleId, permission: PermissionId) -> Result<bool, StoreError> {
        let catalog = self.catalog.read().map_err(lock_err)?;
        if !catalog.iter().any(|p| p.id == permission) {
            return Err(StoreError::conflict(format!(
                "permission {permission} does not exist"
            )));
        }
        drop(catalog);

        let mut links = self.links.write().map_err(lock_err)?;
        Ok(links.insert((role, permission)))
    }

    fn revoke_permission(
        &self,
        role: RoleId,
        permission: PermissionId,
    ) -> Result<bool, StoreError> {
        let mut links = self.links.write().map_err(lock_err)?;
        Ok(links.remove(&(role, permission)))
    }

    fn find_user(&self, id: UserId) -> Result<Option<UserAccount>, StoreError> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users
            .iter()
            .find(|u| u.account.user_id == id)
            .map(|u| u.account.clone()))
    }

    fn set_user_role(&self, user: UserId, role: RoleId) -> Result<(), StoreError> {
        let role_key = {
            let roles = self.roles.read().map_err(lock_err)?;
            match roles
                .iter()
                .find(|r| r.id == role && r.status == RoleStatus::Active)
            {
                Some(r) => r.key.clone(),
                None => return Err(StoreError::conflict(format!("role {role} does not exist"))),
            }
        };

        let mut users = self.users.write().map_err(lock_err)?;
        match users.iter_mut().find(|u| u.account.user_id == user) {
            Some(row) => {
                row.account.role_id = role;
                row.account.role_key = role_key;
                Ok(())
            }
            None => Err(StoreError::conflict(format!("user {user} does not exist"))),
        }
    }
}

fn demo_vehicles() -> Vec<VehicleSummary> {
    vec![
        VehicleSummary {
            id: 1,
            vin: "1HGCM82633A004352".to_string(),
            model: "Accord EX".to_string(),
            year: 2019,
            status: "in_stock".to_string(),
            asking_price: 14_500,
        },
        VehicleSummary {
            id: 2,
            vin: "2T1BURHE5JC014906".to_string(),
            model: "Corolla LE".to_string(),
            year: 2018,
            status: "in_stock".to_string(),
            asking_price: 11_200,
        },
        VehicleSummary {
            id: 3,
            vin: "5YJ3E1EA7KF317621".to_string(),
            model: "Model 3 SR+".to_string(),
            year: 2021,
            status: "sold".to_string(),
            asking_price: 27_900,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_resolves_admin_login() {
        let dir = InMemoryDirectory::seeded();
        let record = dir.find_by_login("admin").unwrap().unwrap();
        assert_eq!(record.role_key, RoleKey::SUPER_ADMIN);
        assert_eq!(record.role_id, RoleId::new(1));
    }

    #[test]
    fn deleting_a_role_drops_its_links() {
        let dir = InMemoryDirectory::seeded();
        let sales = RoleId::new(3);
        assert!(!dir.permission_ids_for_role(sales).unwrap().is_empty());

        dir.delete_role(sales).unwrap();
        assert!(dir.permission_ids_for_role(sales).unwrap().is_empty());
        assert!(dir.find_role(sales).unwrap().is_none());
        assert!(dir.role_by_key(&RoleKey::new("sales")).unwrap().is_none());
    }

    #[test]
    fn duplicate_role_key_conflicts() {
        let dir = InMemoryDirectory::seeded();
        let err = dir
            .create_role("Second Admin", &RoleKey::ADMIN, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn grant_is_idempotent_and_reports_duplicates() {
        let dir = InMemoryDirectory::seeded();
        let sales = RoleId::new(3);
        let archive = PermissionId::new(4);

        assert!(dir.grant_permission(sales, archive).unwrap());
        assert!(!dir.grant_permission(sales, archive).unwrap());
        assert!(dir.revoke_permission(sales, archive).unwrap());
        assert!(!dir.revoke_permission(sales, archive).unwrap());
    }

    #[test]
    fn reassigning_user_role_updates_key() {
        let dir = InMemoryDirectory::seeded();
        let sales_user = dir.find_by_login("sales").unwrap().unwrap();

        dir.set_user_role(sales_user.user_id, RoleId::new(2)).unwrap();

        let updated = dir.find_user(sales_user.user_id).unwrap().unwrap();
        assert_eq!(updated.role_key, RoleKey::ADMIN);
    }
}
