use async_trait::async_trait;
use domain_roles::{Role, entity::role, postgres::attach_permissions};
use query_spec::{Query, QueryAdapter, orm};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::{
    capabilities::{RoleLoad, USER_CAPABILITIES, loads_employee},
    entity::{employee, role_user, user},
    error::{UserError, UserResult},
    models::{Employee, User},
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QueryAdapter for PgUserRepository {
    type Item = User;
    type Error = UserError;

    async fn count(&self, query: &Query) -> UserResult<u64> {
        let select = orm::filtered(user::Entity::find(), query, &USER_CAPABILITIES)?;
        Ok(select.count(&self.db).await?)
    }

    async fn fetch(&self, query: &Query) -> UserResult<Vec<User>> {
        let models = orm::paged(user::Entity::find(), query, &USER_CAPABILITIES)?
            .all(&self.db)
            .await?;
        let mut users: Vec<User> = models.into_iter().map(User::from).collect();

        match RoleLoad::for_query(query) {
            RoleLoad::Skip => {}
            RoleLoad::Roles => attach_roles(&self.db, &mut users, false).await?,
            RoleLoad::RolesWithPermissions => attach_roles(&self.db, &mut users, true).await?,
        }
        if loads_employee(query) {
            attach_employees(&self.db, &mut users).await?;
        }

        tracing::debug!(rows = users.len(), "Fetched users");
        Ok(users)
    }
}

/// Sets `roles` on every user, ordered by role name, optionally with each
/// role's permissions.
pub async fn attach_roles<C>(db: &C, users: &mut [User], with_permissions: bool) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if users.is_empty() {
        return Ok(());
    }

    let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let assignments = role_user::Entity::find()
        .filter(role_user::Column::UserId.is_in(user_ids))
        .all(db)
        .await?;

    let mut assigned: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for assignment in &assignments {
        assigned
            .entry(assignment.user_id)
            .or_default()
            .insert(assignment.role_id);
    }

    let role_ids: HashSet<Uuid> = assignments.iter().map(|a| a.role_id).collect();
    let mut roles: Vec<Role> = if role_ids.is_empty() {
        Vec::new()
    } else {
        role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .order_by_asc(role::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .map(Role::from)
            .collect()
    };

    if with_permissions {
        attach_permissions(db, &mut roles).await?;
    }

    for user in users.iter_mut() {
        let ids = assigned.get(&user.id);
        user.roles = Some(
            roles
                .iter()
                .filter(|r| ids.is_some_and(|ids| ids.contains(&r.id)))
                .cloned()
                .collect(),
        );
    }

    Ok(())
}

/// Sets `employee` on every user that has an employment record, in one query.
pub async fn attach_employees<C>(db: &C, users: &mut [User]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if users.is_empty() {
        return Ok(());
    }

    let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let mut employees: HashMap<Uuid, Employee> = employee::Entity::find()
        .filter(employee::Column::UserId.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.user_id, Employee::from(model)))
        .collect();

    for user in users.iter_mut() {
        user.employee = employees.remove(&user.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain_roles::entity::{permission, permission_role};
    use query_spec::{Operator, Sort};
    use sea_orm::prelude::DateTimeWithTimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn at(day: u32) -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap().fixed_offset()
    }

    fn user_model(id: Uuid, name: &str) -> user::Model {
        user::Model {
            id,
            name: name.to_string(),
            phone_number: String::new(),
            email: format!("{}@example.com", name.to_lowercase()),
            email_verified_at: None,
            activated_at: Some(at(2)),
            deactivated_at: None,
            created_at: at(1),
            updated_at: None,
        }
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

    fn assignment(user_id: Uuid, role_id: Uuid) -> role_user::Model {
        role_user::Model {
            role_id,
            user_id,
            created_at: at(1),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_count_applies_search_and_filters() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::from(4i64))])]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let query = Query::default()
            .with_search("jane")
            .with_filter("created_at", Operator::GreaterThan, "2024-01-01");
        assert_eq!(repo.count(&query).await.unwrap(), 4);

        // Debug output escapes the quoted identifiers
        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains(r#"\"email\" ILIKE"#), "{log}");
        assert!(log.contains(r#"\"name\" ILIKE"#), "{log}");
        assert!(log.contains(r#"\"created_at\" >"#), "{log}");
    }

    #[tokio::test]
    async fn test_fetch_with_roles() {
        let jane = Uuid::now_v7();
        let john = Uuid::now_v7();
        let admin = Uuid::now_v7();
        let editor = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(jane, "Jane"), user_model(john, "John")]])
            .append_query_results([[
                assignment(jane, admin),
                assignment(jane, editor),
                assignment(john, editor),
            ]])
            .append_query_results([[role_model(admin, "admin"), role_model(editor, "editor")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let query = Query::default()
            .with_sort(Sort::asc("name"))
            .with_include("roles");
        let users = repo.fetch(&query).await.unwrap();

        let names = |user: &User| -> Vec<String> {
            user.roles.as_ref().unwrap().iter().map(|r| r.name.clone()).collect()
        };
        assert_eq!(names(&users[0]), ["admin", "editor"]);
        assert_eq!(names(&users[1]), ["editor"]);
        assert!(users[0].roles.as_ref().unwrap()[0].permissions.is_none());
    }

    #[tokio::test]
    async fn test_fetch_with_role_permissions() {
        let jane = Uuid::now_v7();
        let admin = Uuid::now_v7();
        let index = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(jane, "Jane")]])
            .append_query_results([[assignment(jane, admin)]])
            .append_query_results([[role_model(admin, "admin")]])
            .append_query_results([[permission_role::Model {
                permission_id: index,
                role_id: admin,
                created_at: at(1),
                updated_at: None,
            }]])
            .append_query_results([[permission::Model {
                id: index,
                name: "users.index".to_string(),
                created_at: at(1),
            }]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let users = repo
            .fetch(&Query::default().with_include("roles.permissions"))
            .await
            .unwrap();
        let roles = users[0].roles.as_ref().unwrap();
        assert_eq!(roles[0].permissions.as_ref().unwrap()[0].name, "users.index");
    }

    #[tokio::test]
    async fn test_fetch_with_employee() {
        let jane = Uuid::now_v7();
        let john = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(jane, "Jane"), user_model(john, "John")]])
            .append_query_results([[employee::Model {
                user_id: jane,
                employment_identity_number: "EMP-0042".to_string(),
                created_at: at(1),
                updated_at: None,
            }]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let users = repo
            .fetch(&Query::default().with_include("employee"))
            .await
            .unwrap();
        assert_eq!(
            users[0].employee.as_ref().unwrap().employment_identity_number,
            "EMP-0042"
        );
        assert!(users[1].employee.is_none());
        assert!(users[0].roles.is_none());

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains(r#"\"employees\""#), "{log}");
    }

    #[tokio::test]
    async fn test_user_without_assignments_has_no_roles() {
        let jane = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(jane, "Jane")]])
            .append_query_results([Vec::<role_user::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let users = repo
            .fetch(&Query::default().with_include("roles"))
            .await
            .unwrap();
        assert_eq!(users[0].roles, Some(vec![]));
    }
}
