//! Non-conformity repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::non_conformity::{
    CorrectiveAction, CreateNonConformityRequest, ListNonConformitiesQuery, NcStatus,
    NonConformity, UpdateNonConformityRequest,
};
use shared::pagination::PageRequest;
use sqlx::types::Json;
use uuid::Uuid;

use crate::entities::{NcSourceDb, NcStatusDb, NonConformityEntity, SeverityDb};
use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for the tenant's non-conformities.
#[derive(Clone)]
pub struct NonConformityRepository {
    scope: TenantScope,
}

impl NonConformityRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List non-conformities, newest first.
    pub async fn list(
        &self,
        query: &ListNonConformitiesQuery,
        page: PageRequest,
    ) -> Result<(Vec<NonConformity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_non_conformities");
        let status = query.status.map(NcStatusDb::from);
        let severity = query.severity.map(SeverityDb::from);
        let source = query.source.map(NcSourceDb::from);
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM non_conformities
            WHERE tenant_id = $1
              AND ($2::nc_status IS NULL OR status = $2)
              AND ($3::nc_severity IS NULL OR severity = $3)
              AND ($4::nc_source IS NULL OR source = $4)
              AND ($5::uuid IS NULL OR audit_id = $5)
              AND ($6::text IS NULL OR title ILIKE '%' || $6 || '%'
                   OR description ILIKE '%' || $6 || '%')
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(severity)
        .bind(source)
        .bind(query.audit_id)
        .bind(search)
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, NonConformityEntity>(
            r#"
            SELECT id, tenant_id, audit_id, title, description, source, status, severity,
                   root_cause_analysis, corrective_actions, due_date, closed_at,
                   created_at, updated_at
            FROM non_conformities
            WHERE tenant_id = $1
              AND ($2::nc_status IS NULL OR status = $2)
              AND ($3::nc_severity IS NULL OR severity = $3)
              AND ($4::nc_source IS NULL OR source = $4)
              AND ($5::uuid IS NULL OR audit_id = $5)
              AND ($6::text IS NULL OR title ILIKE '%' || $6 || '%'
                   OR description ILIKE '%' || $6 || '%')
            ORDER BY created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(severity)
        .bind(source)
        .bind(query.audit_id)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Find a non-conformity by ID.
    pub async fn find(&self, id: Uuid) -> Result<Option<NonConformity>, sqlx::Error> {
        let entity = sqlx::query_as::<_, NonConformityEntity>(
            r#"
            SELECT id, tenant_id, audit_id, title, description, source, status, severity,
                   root_cause_analysis, corrective_actions, due_date, closed_at,
                   created_at, updated_at
            FROM non_conformities
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Create a non-conformity with status `open`.
    pub async fn create(
        &self,
        request: &CreateNonConformityRequest,
    ) -> Result<NonConformity, sqlx::Error> {
        let timer = QueryTimer::new("create_non_conformity");
        let entity = sqlx::query_as::<_, NonConformityEntity>(
            r#"
            INSERT INTO non_conformities (tenant_id, audit_id, title, description, source,
                                          status, severity, root_cause_analysis, due_date)
            VALUES ($1, $2, $3, $4, $5, 'open', $6, $7, $8)
            RETURNING id, tenant_id, audit_id, title, description, source, status, severity,
                      root_cause_analysis, corrective_actions, due_date, closed_at,
                      created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(request.audit_id)
        .bind(request.title.trim())
        .bind(request.description.as_deref())
        .bind(NcSourceDb::from(request.source))
        .bind(SeverityDb::from(request.severity))
        .bind(request.root_cause_analysis.as_ref())
        .bind(request.due_date)
        .fetch_one(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.into())
    }

    /// Update fields of a non-conformity. `closed_at` is written as given.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateNonConformityRequest,
        status: NcStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<NonConformity>, sqlx::Error> {
        let timer = QueryTimer::new("update_non_conformity");
        let entity = sqlx::query_as::<_, NonConformityEntity>(
            r#"
            UPDATE non_conformities
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                source = COALESCE($5, source),
                status = $6,
                severity = COALESCE($7, severity),
                due_date = COALESCE($8, due_date),
                root_cause_analysis = COALESCE($9, root_cause_analysis),
                closed_at = $10,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, audit_id, title, description, source, status, severity,
                      root_cause_analysis, corrective_actions, due_date, closed_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(request.title.as_deref().map(str::trim))
        .bind(request.description.as_deref())
        .bind(request.source.map(NcSourceDb::from))
        .bind(NcStatusDb::from(status))
        .bind(request.severity.map(SeverityDb::from))
        .bind(request.due_date)
        .bind(request.root_cause_analysis.as_ref())
        .bind(closed_at)
        .fetch_optional(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Append a corrective action.
    pub async fn add_action(
        &self,
        id: Uuid,
        action: &CorrectiveAction,
    ) -> Result<Option<NonConformity>, sqlx::Error> {
        let entity = sqlx::query_as::<_, NonConformityEntity>(
            r#"
            UPDATE non_conformities
            SET corrective_actions = corrective_actions || $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, audit_id, title, description, source, status, severity,
                      root_cause_analysis, corrective_actions, due_date, closed_at,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(Json(vec![action]))
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Delete a non-conformity.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM non_conformities WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(self.scope.tenant_id())
            .execute(self.scope.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
