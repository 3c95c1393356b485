//! Users Domain
//!
//! Read-only user listing for the admin backend. Users can be filtered,
//! sorted and searched (by name and email), and can carry their roles
//! (`include=roles`), the roles' permissions (`include=roles.permissions`)
//! and their employment record (`include=employee`).
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod capabilities;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use capabilities::USER_CAPABILITIES;
pub use error::{UserError, UserResult};
pub use models::{Employee, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
