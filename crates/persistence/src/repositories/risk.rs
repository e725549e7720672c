//! Risk repository for database operations.

use domain::models::risk::{CreateRiskRequest, ListRisksQuery, Risk, UpdateRiskRequest};
use shared::pagination::PageRequest;
use uuid::Uuid;

use crate::entities::{RiskEntity, RiskStatusDb};
use crate::scope::TenantScope;

/// Repository for the tenant's risk register.
#[derive(Clone)]
pub struct RiskRepository {
    scope: TenantScope,
}

impl RiskRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List risks, highest score first.
    pub async fn list(
        &self,
        query: &ListRisksQuery,
        page: PageRequest,
    ) -> Result<(Vec<Risk>, i64), sqlx::Error> {
        let status = query.status.map(RiskStatusDb::from);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM risks
            WHERE tenant_id = $1
              AND ($2::risk_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::int IS NULL OR probability * impact >= $4)
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(query.category.as_deref())
        .bind(query.min_score)
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, RiskEntity>(
            r#"
            SELECT id, tenant_id, description, category, probability, impact, mitigation_plan,
                   status, owner_id, created_at, updated_at
            FROM risks
            WHERE tenant_id = $1
              AND ($2::risk_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::int IS NULL OR probability * impact >= $4)
            ORDER BY probability * impact DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(query.category.as_deref())
        .bind(query.min_score)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Risk>, sqlx::Error> {
        let entity = sqlx::query_as::<_, RiskEntity>(
            r#"
            SELECT id, tenant_id, description, category, probability, impact, mitigation_plan,
                   status, owner_id, created_at, updated_at
            FROM risks
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn create(&self, request: &CreateRiskRequest) -> Result<Risk, sqlx::Error> {
        let entity = sqlx::query_as::<_, RiskEntity>(
            r#"
            INSERT INTO risks (tenant_id, description, category, probability, impact,
                               mitigation_plan, status, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, description, category, probability, impact, mitigation_plan,
                      status, owner_id, created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(request.description.trim())
        .bind(request.category.as_deref())
        .bind(request.probability)
        .bind(request.impact)
        .bind(request.mitigation_plan.as_deref())
        .bind(RiskStatusDb::from(request.status))
        .bind(request.owner_id)
        .fetch_one(self.scope.pool())
        .await?;

        Ok(entity.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateRiskRequest,
    ) -> Result<Option<Risk>, sqlx::Error> {
        let entity = sqlx::query_as::<_, RiskEntity>(
            r#"
            UPDATE risks
            SET
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                probability = COALESCE($5, probability),
                impact = COALESCE($6, impact),
                mitigation_plan = COALESCE($7, mitigation_plan),
                status = COALESCE($8, status),
                owner_id = COALESCE($9, owner_id),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, description, category, probability, impact, mitigation_plan,
                      status, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(request.description.as_deref().map(str::trim))
        .bind(request.category.as_deref())
        .bind(request.probability)
        .bind(request.impact)
        .bind(request.mitigation_plan.as_deref())
        .bind(request.status.map(RiskStatusDb::from))
        .bind(request.owner_id)
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM risks WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(self.scope.tenant_id())
            .execute(self.scope.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
