use async_trait::async_trait;
use query_spec::{Query, QueryAdapter, orm};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::{
    capabilities::{
        PERMISSION_CAPABILITIES, PERMISSIONS_RELATION, ROLE_CAPABILITIES, USERS_RELATION,
    },
    entity::{permission, permission_role, role, role_user, user},
    error::{PermissionError, PermissionResult, RoleError, RoleResult},
    models::{Permission, Role, RoleHolder},
};

pub struct PgRoleRepository {
    db: DatabaseConnection,
}

impl PgRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QueryAdapter for PgRoleRepository {
    type Item = Role;
    type Error = RoleError;

    async fn count(&self, query: &Query) -> RoleResult<u64> {
        let select = orm::filtered(role::Entity::find(), query, &ROLE_CAPABILITIES)?;
        Ok(select.count(&self.db).await?)
    }

    async fn fetch(&self, query: &Query) -> RoleResult<Vec<Role>> {
        let models = orm::paged(role::Entity::find(), query, &ROLE_CAPABILITIES)?
            .all(&self.db)
            .await?;
        let mut roles: Vec<Role> = models.into_iter().map(Role::from).collect();

        let relations = ROLE_CAPABILITIES.relations(query);
        if relations.contains(&PERMISSIONS_RELATION) {
            attach_permissions(&self.db, &mut roles).await?;
        }
        if relations.contains(&USERS_RELATION) {
            attach_users(&self.db, &mut roles).await?;
        }

        tracing::debug!(rows = roles.len(), "Fetched roles");
        Ok(roles)
    }
}

/// Sets `permissions` on every role in `roles`, each list ordered by name.
///
/// Two queries regardless of the number of roles: the grants in
/// `permission_role`, then the granted permissions.
pub async fn attach_permissions<C>(db: &C, roles: &mut [Role]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if roles.is_empty() {
        return Ok(());
    }

    let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
    let grants = permission_role::Entity::find()
        .filter(permission_role::Column::RoleId.is_in(role_ids))
        .all(db)
        .await?;

    let mut granted: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for grant in &grants {
        granted
            .entry(grant.role_id)
            .or_default()
            .insert(grant.permission_id);
    }

    let permission_ids: HashSet<Uuid> = grants.iter().map(|g| g.permission_id).collect();
    let permissions: Vec<Permission> = if permission_ids.is_empty() {
        Vec::new()
    } else {
        permission::Entity::find()
            .filter(permission::Column::Id.is_in(permission_ids))
            .order_by_asc(permission::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Permission::from)
            .collect()
    };

    for role in roles.iter_mut() {
        let ids = granted.get(&role.id);
        role.permissions = Some(
            permissions
                .iter()
                .filter(|p| ids.is_some_and(|ids| ids.contains(&p.id)))
                .cloned()
                .collect(),
        );
    }

    Ok(())
}

/// Sets `users` on every role in `roles`, each list ordered by name.
///
/// Same shape as [`attach_permissions`], over `role_user`.
pub async fn attach_users<C>(db: &C, roles: &mut [Role]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if roles.is_empty() {
        return Ok(());
    }

    let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
    let assignments = role_user::Entity::find()
        .filter(role_user::Column::RoleId.is_in(role_ids))
        .all(db)
        .await?;

    let mut held: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for assignment in &assignments {
        held.entry(assignment.role_id)
            .or_default()
            .insert(assignment.user_id);
    }

    let user_ids: HashSet<Uuid> = assignments.iter().map(|a| a.user_id).collect();
    let holders: Vec<RoleHolder> = if user_ids.is_empty() {
        Vec::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .order_by_asc(user::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(RoleHolder::from)
            .collect()
    };

    for role in roles.iter_mut() {
        let ids = held.get(&role.id);
        role.users = Some(
            holders
                .iter()
                .filter(|u| ids.is_some_and(|ids| ids.contains(&u.id)))
                .cloned()
                .collect(),
        );
    }

    Ok(())
}

pub struct PgPermissionRepository {
    db: DatabaseConnection,
}

impl PgPermissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QueryAdapter for PgPermissionRepository {
    type Item = Permission;
    type Error = PermissionError;

    async fn count(&self, query: &Query) -> PermissionResult<u64> {
        let select = orm::filtered(permission::Entity::find(), query, &PERMISSION_CAPABILITIES)?;
        Ok(select.count(&self.db).await?)
    }

    async fn fetch(&self, query: &Query) -> PermissionResult<Vec<Permission>> {
        let models = orm::paged(permission::Entity::find(), query, &PERMISSION_CAPABILITIES)?
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Permission::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use query_spec::{CapabilityError, Operator, Sort};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction, Value};
    use std::collections::BTreeMap;

    fn at(day: u32) -> sea_orm::prelude::DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap().fixed_offset()
    }

    fn role_model(id: Uuid, name: &str) -> role::Model {
        role::Model {
            id,
            name: name.to_string(),
            is_default: false,
            created_at: at(1),
            updated_at: None,
        }
    }

    fn num_items(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    fn statements(log: Vec<Transaction>) -> Vec<String> {
        log.iter().map(|t| format!("{t:?}")).collect()
    }

    #[tokio::test]
    async fn test_paginate_counts_then_fetches_page() {
        let admin = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[num_items(11)]])
            .append_query_results([[role_model(admin, "admin")]])
            .into_connection();
        let repo = PgRoleRepository::new(db);

        let query = Query::default()
            .with_filter("name", Operator::ILike, "adm")
            .with_sort(Sort::desc("created_at"))
            .with_page(2, 10);
        let page = repo.paginate(&query).await.unwrap();

        assert_eq!(page.total_items, 11);
        assert_eq!(page.offset, 10);
        assert_eq!(page.items.len(), 1);
        assert!(page.items[0].permissions.is_none());

        let log = statements(repo.db.into_transaction_log());
        assert_eq!(log.len(), 2);
        assert!(log[0].contains("COUNT"), "{}", log[0]);
        assert!(log[1].contains("ILIKE"), "{}", log[1]);
        assert!(log[1].contains("LIMIT"), "{}", log[1]);
    }

    #[tokio::test]
    async fn test_fetch_attaches_permissions_when_included() {
        let admin = Uuid::now_v7();
        let guest = Uuid::now_v7();
        let index = Uuid::now_v7();
        let show = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[role_model(admin, "admin"), role_model(guest, "guest")]])
            .append_query_results([[
                permission_role::Model {
                    permission_id: index,
                    role_id: admin,
                    created_at: at(2),
                    updated_at: None,
                },
                permission_role::Model {
                    permission_id: show,
                    role_id: admin,
                    created_at: at(2),
                    updated_at: None,
                },
            ]])
            .append_query_results([[
                permission::Model {
                    id: index,
                    name: "users.index".to_string(),
                    created_at: at(1),
                },
                permission::Model {
                    id: show,
                    name: "users.show".to_string(),
                    created_at: at(1),
                },
            ]])
            .into_connection();
        let repo = PgRoleRepository::new(db);

        let roles = repo
            .fetch(&Query::default().with_include("permissions"))
            .await
            .unwrap();

        let names: Vec<_> = roles[0]
            .permissions
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["users.index", "users.show"]);
        assert_eq!(roles[1].permissions, Some(vec![]));
    }

    #[tokio::test]
    async fn test_fetch_attaches_users_when_included() {
        let admin = Uuid::now_v7();
        let guest = Uuid::now_v7();
        let jane = Uuid::now_v7();
        let john = Uuid::now_v7();

        let assignment = |role_id, user_id| role_user::Model {
            role_id,
            user_id,
            created_at: at(3),
            updated_at: None,
        };
        let holder = |id, name: &str| user::Model {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[role_model(admin, "admin"), role_model(guest, "guest")]])
            .append_query_results([[assignment(admin, jane), assignment(guest, john)]])
            .append_query_results([[holder(jane, "Jane"), holder(john, "John")]])
            .into_connection();
        let repo = PgRoleRepository::new(db);

        let roles = repo
            .fetch(&Query::default().with_include("users"))
            .await
            .unwrap();

        assert_eq!(roles[0].users.as_ref().unwrap()[0].email, "jane@example.com");
        assert_eq!(roles[1].users.as_ref().unwrap()[0].name, "John");
        assert!(roles[0].permissions.is_none());

        let log = statements(repo.db.into_transaction_log());
        assert_eq!(log.len(), 3);
        assert!(log[1].contains("role_user"), "{}", log[1]);
        assert!(log[2].contains("users"), "{}", log[2]);
    }

    #[tokio::test]
    async fn test_rejected_query_never_reaches_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgRoleRepository::new(db);

        let query = Query::default().with_filter("password", Operator::Equal, "x");
        let err = repo.count(&query).await.unwrap_err();
        assert!(matches!(err, RoleError::Query(CapabilityError::UnknownColumn { .. })));
        assert!(repo.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_storage_error_is_returned_unchanged() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("relation does not exist".to_string())])
            .into_connection();
        let repo = PgPermissionRepository::new(db);

        let err = repo.count(&Query::default()).await.unwrap_err();
        assert!(matches!(err, PermissionError::Database(DbErr::Custom(_))));
    }
}
