//! User repository for tenant-scoped user management.

use domain::models::user::{ListUsersQuery, NewUser};
use domain::models::{Role, User};
use shared::pagination::PageRequest;
use uuid::Uuid;

use crate::entities::{UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for the users of one tenant.
#[derive(Clone)]
pub struct UserRepository {
    scope: TenantScope,
}

impl UserRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List users by name.
    pub async fn list(
        &self,
        query: &ListUsersQuery,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let role = query.role.map(UserRoleDb::from);
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE tenant_id = $1
              AND ($2::user_role IS NULL OR role = $2)
              AND ($3::text IS NULL OR full_name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(role)
        .bind(search)
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, full_name, role, is_active,
                   email_verified, last_login_at, created_at, updated_at
            FROM users
            WHERE tenant_id = $1
              AND ($2::user_role IS NULL OR role = $2)
              AND ($3::text IS NULL OR full_name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%')
            ORDER BY full_name ASC, email ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(role)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Find a user of the tenant by ID.
    pub async fn find(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, full_name, role, is_active,
                   email_verified, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Whether every given ID is a user of the tenant.
    pub async fn all_members(&self, ids: &[Uuid]) -> Result<bool, sqlx::Error> {
        if ids.is_empty() {
            return Ok(true);
        }
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(self.scope.tenant_id())
        .bind(&unique)
        .fetch_one(self.scope.pool())
        .await?;

        Ok(found == unique.len() as i64)
    }

    /// Create a user in the tenant. Email verification starts unset.
    pub async fn create(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, full_name, role, email_verified)
            VALUES ($1, $2, $3, $4, $5, false)
            RETURNING id, tenant_id, email, password_hash, full_name, role, is_active,
                      email_verified, last_login_at, created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(UserRoleDb::from(user.role))
        .fetch_one(self.scope.pool())
        .await;
        timer.record();

        Ok(entity?.into())
    }

    /// Update profile, role and active flag.
    pub async fn update(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> Result<Option<User>, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, email, password_hash, full_name, role, is_active,
                      email_verified, last_login_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(full_name)
        .bind(role.map(UserRoleDb::from))
        .bind(is_active)
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }
}
