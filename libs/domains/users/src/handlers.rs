use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{
    ListQuery, RequestUrl, UuidPath,
    errors::responses::{
        BadRequestLookupResponse, BadRequestQueryResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use domain_roles::{Permission, Role, RoleHolder};
use query_spec::{PagePagination, RawQuery};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{Employee, User};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user),
    components(
        schemas(User, Employee, Role, Permission, RoleHolder),
        responses(
            BadRequestQueryResponse,
            BadRequestLookupResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = TAG, description = "User accounts"))
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .with_state(Arc::new(service))
}

/// List users
///
/// Searchable by name and email. `include=roles` adds each user's roles,
/// `include=roles.permissions` the roles' permissions as well, and
/// `include=employee` the employment record.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(RawQuery),
    responses(
        (status = 200, description = "One page of users", body = PagePagination<User>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ListQuery(query): ListQuery,
    RequestUrl(url): RequestUrl,
) -> UserResult<Json<PagePagination<User>>> {
    let page = service.paginate(&query).await?;
    Ok(Json(PagePagination::from_offset(page, &url)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID"),
        RawQuery
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestLookupResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    ListQuery(query): ListQuery,
) -> UserResult<Json<User>> {
    let user = service.show(id, query).await?;
    Ok(Json(user))
}
