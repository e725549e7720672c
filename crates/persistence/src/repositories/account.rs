//! Account repository: registration and credential lookups.
//!
//! These operations run before a tenant is known (sign-up, sign-in, token
//! refresh) and therefore work on the users table without a scope.

use domain::models::tenant::NewTenant;
use domain::models::user::NewUser;
use domain::models::{Tenant, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TenantEntity, TenantPlanDb, TenantStatusDb, UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

/// Repository for account database operations.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tenant and its first administrator in one transaction.
    pub async fn register(
        &self,
        tenant: &NewTenant,
        admin: &NewUser,
    ) -> Result<(Tenant, User), sqlx::Error> {
        let timer = QueryTimer::new("register_tenant");
        let mut tx = self.pool.begin().await?;

        let tenant_entity = sqlx::query_as::<_, TenantEntity>(
            r#"
            INSERT INTO tenants (name, subdomain, plan, status, trial_ends_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, subdomain, plan, status, trial_ends_at, subscription_ends_at,
                      created_at, updated_at
            "#,
        )
        .bind(&tenant.name)
        .bind(&tenant.subdomain)
        .bind(TenantPlanDb::from(tenant.plan))
        .bind(TenantStatusDb::from(tenant.status))
        .bind(tenant.trial_ends_at)
        .fetch_one(&mut *tx)
        .await?;

        let user_entity = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, full_name, role, email_verified)
            VALUES ($1, $2, $3, $4, $5, false)
            RETURNING id, tenant_id, email, password_hash, full_name, role, is_active,
                      email_verified, last_login_at, created_at, updated_at
            "#,
        )
        .bind(tenant_entity.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.full_name)
        .bind(UserRoleDb::from(admin.role))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok((tenant_entity.into(), user_entity.into()))
    }

    /// Check if an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, full_name, role, is_active,
                   email_verified, last_login_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let entity = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, full_name, role, is_active,
                   email_verified, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Stamp a successful sign-in.
    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
