//! Columns, relations and search columns each resource accepts in a query.

use query_spec::{Capabilities, ColumnSpec, Operator};

/// Relation name for a role's permissions.
pub const PERMISSIONS_RELATION: &str = "permissions";
/// Relation name for the users holding a role.
pub const USERS_RELATION: &str = "users";

pub const ROLE_CAPABILITIES: Capabilities = Capabilities::new(
    &[
        ColumnSpec::new("id", Operator::MEMBERSHIP, false),
        ColumnSpec::new("name", Operator::TEXT, true),
        ColumnSpec::new("is_default", Operator::EQUALITY, false),
        ColumnSpec::new("created_at", Operator::ORDERED, true),
        ColumnSpec::new("updated_at", Operator::ORDERED, false),
    ],
    &[PERMISSIONS_RELATION, USERS_RELATION],
    &["name"],
);

pub const PERMISSION_CAPABILITIES: Capabilities = Capabilities::new(
    &[
        ColumnSpec::new("id", Operator::MEMBERSHIP, false),
        ColumnSpec::new("name", Operator::TEXT, true),
        ColumnSpec::new("created_at", Operator::ORDERED, true),
    ],
    &[],
    &["name"],
);
