use query_spec::{OffsetPagination, Query};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{PermissionError, PermissionResult, RoleError, RoleResult};
use crate::models::{Permission, Role};
use crate::repository::{PermissionRepository, RoleRepository};

/// Read access to roles.
#[derive(Clone)]
pub struct RoleService<R: RoleRepository> {
    repository: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of roles matching `query`.
    #[instrument(skip(self, query), fields(page = query.page(), per_page = query.per_page()))]
    pub async fn paginate(&self, query: &Query) -> RoleResult<OffsetPagination<Role>> {
        self.repository.paginate(query).await
    }

    /// The role with `id`. Filters and includes of `query` still apply, so a
    /// filter that excludes the role makes it not found. Paging is ignored.
    #[instrument(skip(self, query))]
    pub async fn show(&self, id: Uuid, query: Query) -> RoleResult<Role> {
        let mut query = query.with_page(1, 1);
        query.filter_by_id(id);
        self.repository
            .first(&query)
            .await?
            .ok_or(RoleError::NotFound(id))
    }
}

/// Read access to permissions.
#[derive(Clone)]
pub struct PermissionService<R: PermissionRepository> {
    repository: Arc<R>,
}

impl<R: PermissionRepository> PermissionService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, query), fields(page = query.page(), per_page = query.per_page()))]
    pub async fn paginate(&self, query: &Query) -> PermissionResult<OffsetPagination<Permission>> {
        self.repository.paginate(query).await
    }

    #[instrument(skip(self, query))]
    pub async fn show(&self, id: Uuid, query: Query) -> PermissionResult<Permission> {
        let mut query = query.with_page(1, 1);
        query.filter_by_id(id);
        self.repository
            .first(&query)
            .await?
            .ok_or(PermissionError::NotFound(id))
    }
}
