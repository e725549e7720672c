//! Tenant repository for database operations.
//!
//! Reads and writes the tenants table itself. Platform administration
//! lists and deletes across tenants through this repository.

use domain::models::tenant::{ListTenantsQuery, TenantPlan, TenantStatus, SYSTEM_SUBDOMAIN};
use domain::models::Tenant;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TenantEntity, TenantPlanDb, TenantStatusDb};
use crate::metrics::QueryTimer;

/// Repository for tenant database operations.
#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find tenant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TenantEntity>(
            r#"
            SELECT id, name, subdomain, plan, status, trial_ends_at, subscription_ends_at,
                   created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Check if a subdomain is already taken.
    pub async fn subdomain_exists(&self, subdomain: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tenants WHERE subdomain = $1)")
            .bind(subdomain)
            .fetch_one(&self.pool)
            .await
    }

    /// List tenants with pagination and filtering.
    pub async fn list(
        &self,
        query: &ListTenantsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Tenant>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_tenants");
        let status = query.status.map(TenantStatusDb::from);
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tenants
            WHERE ($1::tenant_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%'
                   OR subdomain ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(status)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, TenantEntity>(
            r#"
            SELECT id, name, subdomain, plan, status, trial_ends_at, subscription_ends_at,
                   created_at, updated_at
            FROM tenants
            WHERE ($1::tenant_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%'
                   OR subdomain ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Update tenant name and plan.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        plan: Option<TenantPlan>,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TenantEntity>(
            r#"
            UPDATE tenants
            SET name = COALESCE($2, name), plan = COALESCE($3, plan), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, subdomain, plan, status, trial_ends_at, subscription_ends_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(plan.map(TenantPlanDb::from))
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Change a tenant's status. The system tenant is never matched.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TenantStatus,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let entity = sqlx::query_as::<_, TenantEntity>(
            r#"
            UPDATE tenants
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND subdomain <> $3
            RETURNING id, name, subdomain, plan, status, trial_ends_at, subscription_ends_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(TenantStatusDb::from(status))
        .bind(SYSTEM_SUBDOMAIN)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Hard delete a tenant and, through cascades, everything it owns.
    /// The system tenant is never matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_tenant");
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1 AND subdomain <> $2")
            .bind(id)
            .bind(SYSTEM_SUBDOMAIN)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}
