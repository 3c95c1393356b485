//! Roles and permissions
//!
//! Read-only list and show endpoints for roles and permissions, both served
//! through the query language of [`query_spec`]: filters, sorts, search,
//! includes and page-based pagination.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← ListQuery / RequestUrl extractors, PagePagination envelope
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← paginate, show (find by id + first)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← QueryAdapter: in-memory or PostgreSQL
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Role, Permission, capability tables
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_roles::{handlers, InMemoryRoleRepository, RoleService};
//!
//! let service = RoleService::new(InMemoryRoleRepository::new());
//! let router = handlers::roles_router(service);
//! ```

pub mod capabilities;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use capabilities::{PERMISSION_CAPABILITIES, ROLE_CAPABILITIES};
pub use error::{PermissionError, PermissionResult, RoleError, RoleResult};
pub use models::{Permission, Role, RoleHolder};
pub use postgres::{PgPermissionRepository, PgRoleRepository};
pub use repository::{
    InMemoryPermissionRepository, InMemoryRoleRepository, PermissionRepository, RoleRepository,
};
pub use service::{PermissionService, RoleService};
