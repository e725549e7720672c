//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRoleDb {
    SuperAdmin,
    TenantAdmin,
    Auditor,
    User,
    Consultant,
}

impl From<UserRoleDb> for Role {
    fn from(db: UserRoleDb) -> Self {
        match db {
            UserRoleDb::SuperAdmin => Self::SuperAdmin,
            UserRoleDb::TenantAdmin => Self::TenantAdmin,
            UserRoleDb::Auditor => Self::Auditor,
            UserRoleDb::User => Self::User,
            UserRoleDb::Consultant => Self::Consultant,
        }
    }
}

impl From<Role> for UserRoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Self::SuperAdmin,
            Role::TenantAdmin => Self::TenantAdmin,
            Role::Auditor => Self::Auditor,
            Role::User => Self::User,
            Role::Consultant => Self::Consultant,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRoleDb,
    pub is_active: bool,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            email: entity.email,
            password_hash: entity.password_hash,
            full_name: entity.full_name,
            role: entity.role.into(),
            is_active: entity.is_active,
            email_verified: entity.email_verified,
            last_login_at: entity.last_login_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
