use query_spec::{OffsetPagination, Query};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// Service layer for reading users
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, query), fields(page = query.page(), per_page = query.per_page()))]
    pub async fn paginate(&self, query: &Query) -> UserResult<OffsetPagination<User>> {
        self.repository.paginate(query).await
    }

    /// The user with `id`, honouring the filters and includes of `query`.
    #[instrument(skip(self, query))]
    pub async fn show(&self, id: Uuid, query: Query) -> UserResult<User> {
        let mut query = query.with_page(1, 1);
        query.filter_by_id(id);
        self.repository
            .first(&query)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}
