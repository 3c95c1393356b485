use chrono::{DateTime, Utc};
use domain_roles::Role;
use query_spec::memory::{Field, Record};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Employment record attached with `include=employee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub user_id: Uuid,
    #[schema(example = "EMP-0042")]
    pub employment_identity_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn new(user_id: Uuid, employment_identity_number: impl Into<String>) -> Self {
        Self {
            user_id,
            employment_identity_number: employment_identity_number.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// An admin-visible user account. Credentials are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub phone_number: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Present only with `include=roles` or `include=roles.permissions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    /// Present with `include=employee` when the user is an employee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            phone_number: String::new(),
            email_verified_at: None,
            activated_at: None,
            deactivated_at: None,
            created_at: Utc::now(),
            updated_at: None,
            roles: None,
            employee: None,
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = Some(roles);
        self
    }

    pub fn with_employment_identity_number(mut self, number: impl Into<String>) -> Self {
        self.employee = Some(Employee::new(self.id, number));
        self
    }

    /// Activated and not deactivated since.
    pub fn is_active(&self) -> bool {
        self.activated_at.is_some() && self.deactivated_at.is_none()
    }
}

impl Record for User {
    fn field(&self, column: &str) -> Option<Field<'_>> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "email" => Some((&self.email).into()),
            "phone_number" => Some((&self.phone_number).into()),
            "email_verified_at" => Some(self.email_verified_at.into()),
            "activated_at" => Some(self.activated_at.into()),
            "deactivated_at" => Some(self.deactivated_at.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}
