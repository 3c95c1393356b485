use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Admin API",
        version = "0.1.0",
        description = "Read access to users, roles and permissions with filtering, sorting, search, includes and pagination"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/roles", api = domain_roles::handlers::RolesApiDoc),
        (path = "/permissions", api = domain_roles::handlers::PermissionsApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
