//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role of a user inside their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    TenantAdmin,
    Auditor,
    User,
    Consultant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::TenantAdmin => "tenant_admin",
            Role::Auditor => "auditor",
            Role::User => "user",
            Role::Consultant => "consultant",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "super_admin" => Ok(Role::SuperAdmin),
            "tenant_admin" => Ok(Role::TenantAdmin),
            "auditor" => Ok(Role::Auditor),
            "user" => Ok(Role::User),
            "consultant" => Ok(Role::Consultant),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

/// Request payload for creating a user inside the caller's tenant.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub full_name: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

/// Request payload for updating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<Role>,
    pub search: Option<String>,
}

fn default_role() -> Role {
    Role::User
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("tenant_admin").unwrap(), Role::TenantAdmin);
        assert_eq!(Role::from_str("SUPER_ADMIN").unwrap(), Role::SuperAdmin);
        assert!(Role::from_str("owner").is_err());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Role::TenantAdmin).unwrap(),
            serde_json::json!("tenant_admin")
        );
        assert_eq!(Role::Consultant.to_string(), "consultant");
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "a@acme.com".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: "A".into(),
            role: Role::User,
            is_active: true,
            email_verified: false,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"emailVerified\":false"));
    }

    #[test]
    fn test_create_user_defaults_role() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "email": "b@acme.com",
            "password": "secret123",
            "fullName": "B"
        }))
        .unwrap();
        assert_eq!(req.role, Role::User);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_user_rejects_short_password() {
        let req = CreateUserRequest {
            email: "b@acme.com".into(),
            password: "short".into(),
            full_name: "B".into(),
            role: Role::User,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@Acme.COM "), "a@acme.com");
    }
}
