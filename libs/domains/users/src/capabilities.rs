use query_spec::{Capabilities, ColumnSpec, Operator};

pub const ROLES_RELATION: &str = "roles";
/// Loads roles together with their permissions.
pub const ROLE_PERMISSIONS_RELATION: &str = "roles.permissions";
pub const EMPLOYEE_RELATION: &str = "employee";

pub const USER_CAPABILITIES: Capabilities = Capabilities::new(
    &[
        ColumnSpec::new("id", Operator::MEMBERSHIP, false),
        ColumnSpec::new("name", Operator::TEXT, true),
        ColumnSpec::new("email", Operator::TEXT, true),
        ColumnSpec::new("phone_number", Operator::TEXT, false),
        ColumnSpec::new("email_verified_at", Operator::ORDERED, false),
        ColumnSpec::new("activated_at", Operator::ORDERED, false),
        ColumnSpec::new("deactivated_at", Operator::ORDERED, false),
        ColumnSpec::new("created_at", Operator::ORDERED, true),
        ColumnSpec::new("updated_at", Operator::ORDERED, false),
    ],
    &[ROLES_RELATION, ROLE_PERMISSIONS_RELATION, EMPLOYEE_RELATION],
    &["name", "email"],
);

/// How much role data a query asks to load with each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLoad {
    Skip,
    Roles,
    RolesWithPermissions,
}

impl RoleLoad {
    /// `roles.permissions` implies `roles`.
    pub fn for_query(query: &query_spec::Query) -> Self {
        let relations = USER_CAPABILITIES.relations(query);
        if relations.contains(&ROLE_PERMISSIONS_RELATION) {
            Self::RolesWithPermissions
        } else if relations.contains(&ROLES_RELATION) {
            Self::Roles
        } else {
            Self::Skip
        }
    }
}

/// Whether `include=employee` was requested.
pub fn loads_employee(query: &query_spec::Query) -> bool {
    USER_CAPABILITIES
        .relations(query)
        .contains(&EMPLOYEE_RELATION)
}
