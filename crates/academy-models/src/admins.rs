//! Administrator accounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use academy_core::serde::deserialize_optional_trimmed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "admin_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AdminRole::Admin),
            "super_admin" => Ok(AdminRole::SuperAdmin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// Full admin row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminProfile {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            role: admin.role,
            is_active: admin.is_active,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub username: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub email: Option<String>,
}

/// Input for creating an admin from the command line.
#[derive(Debug, Clone, Validate)]
pub struct CreateAdminDto {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: AdminRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [AdminRole::Admin, AdminRole::SuperAdmin] {
            assert_eq!(role.as_str().parse::<AdminRole>(), Ok(role));
        }
        assert!("teacher".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_profile_hides_password() {
        let admin = Admin {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            role: AdminRole::SuperAdmin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(AdminProfile::from(admin)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "super_admin");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_update_profile_validation() {
        let dto = UpdateProfileDto {
            username: Some("ab".to_string()),
            email: Some("nope".to_string()),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));

        let empty = UpdateProfileDto {
            username: None,
            email: None,
        };
        assert!(empty.validate().is_ok());
    }
}
