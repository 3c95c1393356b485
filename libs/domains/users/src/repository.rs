use async_trait::async_trait;
use query_spec::{Query, QueryAdapter, memory};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::capabilities::{RoleLoad, USER_CAPABILITIES, loads_employee};
use crate::error::{UserError, UserResult};
use crate::models::User;

/// Any adapter that answers user queries.
pub trait UserRepository: QueryAdapter<Item = User, Error = UserError> {}

impl<T> UserRepository for T where T: QueryAdapter<Item = User, Error = UserError> {}

/// In-memory user store (for development/testing).
///
/// Users are stored with their roles, the roles' permissions and their
/// employment record; results carry only what the query includes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn insert(&self, user: User) {
        tracing::debug!(user_id = %user.id, "Stored user");
        self.users.write().await.push(user);
    }
}

fn shape(mut user: User, load: RoleLoad, with_employee: bool) -> User {
    if !with_employee {
        user.employee = None;
    }
    user.roles = match load {
        RoleLoad::Skip => None,
        RoleLoad::Roles | RoleLoad::RolesWithPermissions => Some(
            user.roles
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|role| role.retain_permissions(load == RoleLoad::RolesWithPermissions))
                .collect(),
        ),
    };
    user
}

#[async_trait]
impl QueryAdapter for InMemoryUserRepository {
    type Item = User;
    type Error = UserError;

    async fn count(&self, query: &Query) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(memory::count(users.iter(), query, &USER_CAPABILITIES)?)
    }

    async fn fetch(&self, query: &Query) -> UserResult<Vec<User>> {
        let load = RoleLoad::for_query(query);
        let with_employee = loads_employee(query);
        let users = self.users.read().await;
        let page = memory::select(users.iter(), query, &USER_CAPABILITIES)?;
        Ok(page
            .into_iter()
            .map(|user| shape(user, load, with_employee))
            .collect())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub UserRepository {}

        #[async_trait]
        impl QueryAdapter for UserRepository {
            type Item = User;
            type Error = UserError;

            async fn count(&self, query: &Query) -> UserResult<u64>;
            async fn fetch(&self, query: &Query) -> UserResult<Vec<User>>;
        }
    }
}
