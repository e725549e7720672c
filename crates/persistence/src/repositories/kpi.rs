//! KPI repository for database operations.

use domain::models::kpi::{CreateKpiRequest, Kpi, ListKpisQuery, Measurement, UpdateKpiRequest};
use shared::pagination::PageRequest;
use sqlx::types::Json;
use uuid::Uuid;

use crate::entities::{KpiDirectionDb, KpiEntity, KpiFrequencyDb};
use crate::scope::TenantScope;

/// Repository for the tenant's KPIs.
#[derive(Clone)]
pub struct KpiRepository {
    scope: TenantScope,
}

impl KpiRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List KPIs by name.
    pub async fn list(
        &self,
        query: &ListKpisQuery,
        page: PageRequest,
    ) -> Result<(Vec<Kpi>, i64), sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM kpis
            WHERE tenant_id = $1 AND ($2::text IS NULL OR category = $2)
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(query.category.as_deref())
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, KpiEntity>(
            r#"
            SELECT id, tenant_id, name, description, category, unit, target_value, direction,
                   frequency, measurements, created_at, updated_at
            FROM kpis
            WHERE tenant_id = $1 AND ($2::text IS NULL OR category = $2)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(query.category.as_deref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Kpi>, sqlx::Error> {
        let entity = sqlx::query_as::<_, KpiEntity>(
            r#"
            SELECT id, tenant_id, name, description, category, unit, target_value, direction,
                   frequency, measurements, created_at, updated_at
            FROM kpis
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn create(&self, request: &CreateKpiRequest) -> Result<Kpi, sqlx::Error> {
        let entity = sqlx::query_as::<_, KpiEntity>(
            r#"
            INSERT INTO kpis (tenant_id, name, description, category, unit, target_value,
                              direction, frequency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, name, description, category, unit, target_value, direction,
                      frequency, measurements, created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(request.name.trim())
        .bind(request.description.as_deref())
        .bind(request.category.as_deref())
        .bind(request.unit.as_deref())
        .bind(request.target_value)
        .bind(KpiDirectionDb::from(request.direction))
        .bind(KpiFrequencyDb::from(request.frequency))
        .fetch_one(self.scope.pool())
        .await?;

        Ok(entity.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateKpiRequest,
    ) -> Result<Option<Kpi>, sqlx::Error> {
        let entity = sqlx::query_as::<_, KpiEntity>(
            r#"
            UPDATE kpis
            SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                unit = COALESCE($6, unit),
                target_value = COALESCE($7, target_value),
                direction = COALESCE($8, direction),
                frequency = COALESCE($9, frequency),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, name, description, category, unit, target_value, direction,
                      frequency, measurements, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.description.as_deref())
        .bind(request.category.as_deref())
        .bind(request.unit.as_deref())
        .bind(request.target_value)
        .bind(request.direction.map(KpiDirectionDb::from))
        .bind(request.frequency.map(KpiFrequencyDb::from))
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Append a measurement to the end of the series.
    pub async fn add_measurement(
        &self,
        id: Uuid,
        measurement: &Measurement,
    ) -> Result<Option<Kpi>, sqlx::Error> {
        let entity = sqlx::query_as::<_, KpiEntity>(
            r#"
            UPDATE kpis
            SET measurements = measurements || $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, name, description, category, unit, target_value, direction,
                      frequency, measurements, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(Json(vec![measurement]))
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM kpis WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(self.scope.tenant_id())
            .execute(self.scope.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
