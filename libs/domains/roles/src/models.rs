use chrono::{DateTime, Utc};
use query_spec::memory::{Field, Record};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A named capability granted to roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    #[schema(example = "users.index")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A user holding a role, as listed under `include=users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoleHolder {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

/// A role, optionally with its permissions (`include=permissions`) and the
/// users holding it (`include=users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    #[schema(example = "admin")]
    pub name: String,
    /// Assigned to new users
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Present only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<RoleHolder>>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            is_default: false,
            created_at: Utc::now(),
            updated_at: None,
            permissions: None,
            users: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn with_users(mut self, users: Vec<RoleHolder>) -> Self {
        self.users = Some(users);
        self
    }

    /// Drops loaded permissions unless `keep` is set.
    pub fn retain_permissions(mut self, keep: bool) -> Self {
        if keep {
            self.permissions.get_or_insert_with(Vec::new);
        } else {
            self.permissions = None;
        }
        self
    }

    /// Same as [`Role::retain_permissions`], for the holders.
    pub fn retain_users(mut self, keep: bool) -> Self {
        if keep {
            self.users.get_or_insert_with(Vec::new);
        } else {
            self.users = None;
        }
        self
    }
}

impl Record for Role {
    fn field(&self, column: &str) -> Option<Field<'_>> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "is_default" => Some(self.is_default.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

impl Record for Permission {
    fn field(&self, column: &str) -> Option<Field<'_>> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some((&self.name).into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_omitted_unless_loaded() {
        let role = Role::new("admin");
        let json = serde_json::to_value(&role).unwrap();
        assert!(json.get("permissions").is_none());
        assert!(json["updated_at"].is_null());

        let role = role.with_permissions(vec![Permission::new("users.index")]);
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["permissions"][0]["name"], "users.index");
    }

    #[test]
    fn test_retain_permissions() {
        let role = Role::new("admin").with_permissions(vec![Permission::new("users.index")]);
        assert!(role.clone().retain_permissions(false).permissions.is_none());
        assert_eq!(role.retain_permissions(true).permissions.unwrap().len(), 1);

        let bare = Role::new("guest").retain_permissions(true);
        assert_eq!(bare.permissions, Some(vec![]));
    }

    #[test]
    fn test_users_listed_only_when_loaded() {
        let holder = RoleHolder {
            id: Uuid::now_v7(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
        };
        let role = Role::new("admin").with_users(vec![holder]);

        let json = serde_json::to_value(role.clone()).unwrap();
        assert_eq!(json["users"][0]["email"], "jane@example.com");
        assert!(json.get("permissions").is_none());

        let json = serde_json::to_value(role.retain_users(false)).unwrap();
        assert!(json.get("users").is_none());
        assert_eq!(Role::new("guest").retain_users(true).users, Some(vec![]));
    }

    #[test]
    fn test_record_fields() {
        let role = Role::new("admin");
        assert_eq!(role.field("name"), Some(Field::Text("admin")));
        assert_eq!(role.field("updated_at"), Some(Field::Null));
        assert_eq!(role.field("password"), None);
    }
}
