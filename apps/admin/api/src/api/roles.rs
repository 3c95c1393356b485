use axum::Router;
use domain_roles::{
    PermissionService, PgPermissionRepository, PgRoleRepository, RoleService, handlers,
};

pub fn roles_router(state: &crate::state::AppState) -> Router {
    let repository = PgRoleRepository::new(state.db.clone());
    handlers::roles_router(RoleService::new(repository))
}

pub fn permissions_router(state: &crate::state::AppState) -> Router {
    let repository = PgPermissionRepository::new(state.db.clone());
    handlers::permissions_router(PermissionService::new(repository))
}
