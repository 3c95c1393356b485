//! Sea-ORM entities for `users` and `employees`.
//!
//! The `role_user` junction belongs to the roles domain and is re-exported
//! here for the role loader.

pub mod employee;
pub mod user;

pub use domain_roles::entity::role_user;
