use async_trait::async_trait;
use query_spec::{Query, QueryAdapter, memory};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::capabilities::{
    PERMISSION_CAPABILITIES, PERMISSIONS_RELATION, ROLE_CAPABILITIES, USERS_RELATION,
};
use crate::error::{PermissionError, PermissionResult, RoleError, RoleResult};
use crate::models::{Permission, Role};

/// Any adapter that answers role queries.
pub trait RoleRepository: QueryAdapter<Item = Role, Error = RoleError> {}

impl<T> RoleRepository for T where T: QueryAdapter<Item = Role, Error = RoleError> {}

/// Any adapter that answers permission queries.
pub trait PermissionRepository: QueryAdapter<Item = Permission, Error = PermissionError> {}

impl<T> PermissionRepository for T where T: QueryAdapter<Item = Permission, Error = PermissionError> {}

/// In-memory role store (for development/testing).
///
/// Roles are kept with their permissions and holders; both are stripped from
/// results unless the query includes them.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<Vec<Role>>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: Vec<Role>) -> Self {
        Self {
            roles: Arc::new(RwLock::new(roles)),
        }
    }

    pub async fn insert(&self, role: Role) {
        tracing::debug!(role_id = %role.id, "Stored role");
        self.roles.write().await.push(role);
    }
}

#[async_trait]
impl QueryAdapter for InMemoryRoleRepository {
    type Item = Role;
    type Error = RoleError;

    async fn count(&self, query: &Query) -> RoleResult<u64> {
        let roles = self.roles.read().await;
        Ok(memory::count(roles.iter(), query, &ROLE_CAPABILITIES)?)
    }

    async fn fetch(&self, query: &Query) -> RoleResult<Vec<Role>> {
        let relations = ROLE_CAPABILITIES.relations(query);
        let with_permissions = relations.contains(&PERMISSIONS_RELATION);
        let with_users = relations.contains(&USERS_RELATION);

        let roles = self.roles.read().await;
        let page = memory::select(roles.iter(), query, &ROLE_CAPABILITIES)?;
        Ok(page
            .into_iter()
            .map(|role| {
                role.retain_permissions(with_permissions)
                    .retain_users(with_users)
            })
            .collect())
    }
}

/// In-memory permission store (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryPermissionRepository {
    permissions: Arc<RwLock<Vec<Permission>>>,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permissions(permissions: Vec<Permission>) -> Self {
        Self {
            permissions: Arc::new(RwLock::new(permissions)),
        }
    }

    pub async fn insert(&self, permission: Permission) {
        self.permissions.write().await.push(permission);
    }
}

#[async_trait]
impl QueryAdapter for InMemoryPermissionRepository {
    type Item = Permission;
    type Error = PermissionError;

    async fn count(&self, query: &Query) -> PermissionResult<u64> {
        let permissions = self.permissions.read().await;
        Ok(memory::count(permissions.iter(), query, &PERMISSION_CAPABILITIES)?)
    }

    async fn fetch(&self, query: &Query) -> PermissionResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        Ok(memory::select(permissions.iter(), query, &PERMISSION_CAPABILITIES)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleHolder;
    use query_spec::{CapabilityError, Operator, Sort};
    use uuid::Uuid;

    fn seeded() -> InMemoryRoleRepository {
        let admin = Role::new("admin")
            .with_permissions(vec![Permission::new("users.index"), Permission::new("users.show")]);
        let mut user = Role::new("user");
        user.is_default = true;
        let auditor = Role::new("auditor").with_permissions(vec![Permission::new("users.index")]);

        InMemoryRoleRepository::with_roles(vec![admin, user, auditor])
    }

    #[tokio::test]
    async fn test_paginate_sorted_by_name() {
        let repo = seeded();
        let query = Query::default().with_sort(Sort::asc("name")).with_page(1, 2);

        let page = repo.paginate(&query).await.unwrap();
        assert_eq!(page.total_items, 3);
        let names: Vec<_> = page.items.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["admin", "auditor"]);
    }

    #[tokio::test]
    async fn test_filter_on_flag() {
        let repo = seeded();
        let query = Query::default().with_filter("is_default", Operator::Equal, "true");

        let roles = repo.fetch(&query).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "user");
    }

    #[tokio::test]
    async fn test_permissions_only_when_included() {
        let repo = seeded();
        let query = Query::default().with_filter("name", Operator::Equal, "admin");

        let role = repo.first(&query).await.unwrap().unwrap();
        assert!(role.permissions.is_none());

        let role = repo
            .first(&query.clone().with_include("Permissions"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(role.permissions.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_included_but_ungranted_is_empty_list() {
        let repo = seeded();
        let query = Query::default()
            .with_filter("name", Operator::Equal, "user")
            .with_include("permissions");

        let role = repo.first(&query).await.unwrap().unwrap();
        assert_eq!(role.permissions, Some(vec![]));
    }

    #[tokio::test]
    async fn test_users_only_when_included() {
        let holder = RoleHolder {
            id: Uuid::now_v7(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        };
        let repo = InMemoryRoleRepository::with_roles(vec![
            Role::new("admin").with_users(vec![holder]),
            Role::new("guest"),
        ]);
        let query = Query::default().with_sort(Sort::asc("name"));

        let roles = repo.fetch(&query).await.unwrap();
        assert!(roles.iter().all(|r| r.users.is_none()));

        let roles = repo.fetch(&query.with_include("users")).await.unwrap();
        assert_eq!(roles[0].users.as_ref().unwrap()[0].name, "Jane");
        assert_eq!(roles[1].users, Some(vec![]));
        assert!(roles[0].permissions.is_none());
    }

    #[tokio::test]
    async fn test_search_matches_name() {
        let repo = seeded();
        let page = repo.paginate(&Query::default().with_search("AUD")).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "auditor");
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected() {
        let repo = seeded();
        let query = Query::default().with_filter("password", Operator::Equal, "x");

        let err = repo.count(&query).await.unwrap_err();
        assert!(matches!(
            err,
            RoleError::Query(CapabilityError::UnknownColumn { ref column }) if column == "password"
        ));
    }

    #[tokio::test]
    async fn test_permission_repository() {
        let repo = InMemoryPermissionRepository::new();
        repo.insert(Permission::new("roles.index")).await;
        repo.insert(Permission::new("users.index")).await;

        let query = Query::default()
            .with_filter("name", Operator::Like, "users")
            .with_sort(Sort::desc("created_at"));
        let page = repo.paginate(&query).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "users.index");

        let err = repo
            .fetch(&Query::default().with_include("roles").with_sort(Sort::asc("id")))
            .await
            .unwrap_err();
        assert!(matches!(err, PermissionError::Query(CapabilityError::UnsortableColumn { .. })));
    }
}
