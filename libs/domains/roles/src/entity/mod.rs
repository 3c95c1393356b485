//! Sea-ORM entities for the `roles`, `permissions` and `permission_role` tables,
//! the `role_user` junction, and the slice of `users` a role lists.

pub mod permission;
pub mod permission_role;
pub mod role;
pub mod role_user;
pub mod user;
