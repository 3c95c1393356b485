use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{
    ListQuery, RequestUrl, UuidPath,
    errors::responses::{
        BadRequestLookupResponse, BadRequestQueryResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use query_spec::{PagePagination, RawQuery};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{PermissionResult, RoleResult};
use crate::models::{Permission, Role, RoleHolder};
use crate::repository::{PermissionRepository, RoleRepository};
use crate::service::{PermissionService, RoleService};

pub const ROLES_TAG: &str = "roles";
pub const PERMISSIONS_TAG: &str = "permissions";

/// OpenAPI documentation for the roles endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_roles, get_role),
    components(
        schemas(Role, Permission, RoleHolder),
        responses(
            BadRequestQueryResponse,
            BadRequestLookupResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = ROLES_TAG, description = "Roles and their permissions"))
)]
pub struct RolesApiDoc;

/// OpenAPI documentation for the permissions endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_permissions, get_permission),
    components(
        schemas(Permission),
        responses(
            BadRequestQueryResponse,
            BadRequestLookupResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags((name = PERMISSIONS_TAG, description = "Permissions that can be granted to roles"))
)]
pub struct PermissionsApiDoc;

pub fn roles_router<R: RoleRepository + 'static>(service: RoleService<R>) -> Router {
    Router::new()
        .route("/", get(list_roles))
        .route("/{id}", get(get_role))
        .with_state(Arc::new(service))
}

pub fn permissions_router<R: PermissionRepository + 'static>(
    service: PermissionService<R>,
) -> Router {
    Router::new()
        .route("/", get(list_permissions))
        .route("/{id}", get(get_permission))
        .with_state(Arc::new(service))
}

/// List roles
///
/// Searchable by name. `include=permissions` loads each role's permissions,
/// `include=users` the users holding it.
#[utoipa::path(
    get,
    path = "",
    tag = ROLES_TAG,
    params(RawQuery),
    responses(
        (status = 200, description = "One page of roles", body = PagePagination<Role>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_roles<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    ListQuery(query): ListQuery,
    RequestUrl(url): RequestUrl,
) -> RoleResult<Json<PagePagination<Role>>> {
    let page = service.paginate(&query).await?;
    Ok(Json(PagePagination::from_offset(page, &url)))
}

/// Get a role by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ROLES_TAG,
    params(
        ("id" = Uuid, Path, description = "Role ID"),
        RawQuery
    ),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 400, response = BadRequestLookupResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    UuidPath(id): UuidPath,
    ListQuery(query): ListQuery,
) -> RoleResult<Json<Role>> {
    let role = service.show(id, query).await?;
    Ok(Json(role))
}

/// List permissions
#[utoipa::path(
    get,
    path = "",
    tag = PERMISSIONS_TAG,
    params(RawQuery),
    responses(
        (status = 200, description = "One page of permissions", body = PagePagination<Permission>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_permissions<R: PermissionRepository>(
    State(service): State<Arc<PermissionService<R>>>,
    ListQuery(query): ListQuery,
    RequestUrl(url): RequestUrl,
) -> PermissionResult<Json<PagePagination<Permission>>> {
    let page = service.paginate(&query).await?;
    Ok(Json(PagePagination::from_offset(page, &url)))
}

/// Get a permission by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PERMISSIONS_TAG,
    params(
        ("id" = Uuid, Path, description = "Permission ID"),
        RawQuery
    ),
    responses(
        (status = 200, description = "Permission found", body = Permission),
        (status = 400, response = BadRequestLookupResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_permission<R: PermissionRepository>(
    State(service): State<Arc<PermissionService<R>>>,
    UuidPath(id): UuidPath,
    ListQuery(query): ListQuery,
) -> PermissionResult<Json<Permission>> {
    let permission = service.show(id, query).await?;
    Ok(Json(permission))
}
