//! Audit repository for database operations.

use domain::models::audit::{
    Audit, AuditStatus, CreateAuditRequest, ListAuditsQuery, StatusChange, UpdateAuditRequest,
};
use domain::models::standard::TemplateEntry;
use shared::pagination::PageRequest;
use uuid::Uuid;

use crate::entities::{AuditEntity, AuditStatusDb, AuditTypeDb};
use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for the tenant's audits.
#[derive(Clone)]
pub struct AuditRepository {
    scope: TenantScope,
}

impl AuditRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List audits, most recently planned first.
    pub async fn list(
        &self,
        query: &ListAuditsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Audit>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_audits");
        let status = query.status.map(AuditStatusDb::from);
        let audit_type = query.audit_type.map(AuditTypeDb::from);
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM audits
            WHERE tenant_id = $1
              AND ($2::audit_status IS NULL OR status = $2)
              AND ($3::audit_type IS NULL OR audit_type = $3)
              AND ($4::text IS NULL OR title ILIKE '%' || $4 || '%')
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(audit_type)
        .bind(search)
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, AuditEntity>(
            r#"
            SELECT id, tenant_id, title, audit_type, status, planned_date, start_date, end_date,
                   actual_date, scope, objectives, iso_standard, conclusions, lead_auditor_id,
                   created_at, updated_at
            FROM audits
            WHERE tenant_id = $1
              AND ($2::audit_status IS NULL OR status = $2)
              AND ($3::audit_type IS NULL OR audit_type = $3)
              AND ($4::text IS NULL OR title ILIKE '%' || $4 || '%')
            ORDER BY planned_date DESC NULLS LAST, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(audit_type)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Find an audit by ID.
    pub async fn find(&self, id: Uuid) -> Result<Option<Audit>, sqlx::Error> {
        let timer = QueryTimer::new("find_audit");
        let entity = sqlx::query_as::<_, AuditEntity>(
            r#"
            SELECT id, tenant_id, title, audit_type, status, planned_date, start_date, end_date,
                   actual_date, scope, objectives, iso_standard, conclusions, lead_auditor_id,
                   created_at, updated_at
            FROM audits
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// IDs of the users responsible for an audit.
    pub async fn responsible_user_ids(&self, audit_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT r.user_id
            FROM audit_responsible_users r
            JOIN audits a ON a.id = r.audit_id
            WHERE r.audit_id = $1 AND a.tenant_id = $2
            ORDER BY r.user_id
            "#,
        )
        .bind(audit_id)
        .bind(self.scope.tenant_id())
        .fetch_all(self.scope.pool())
        .await
    }

    /// Create an audit, its responsible-user links and, when a template is
    /// given, one checklist row per template entry. All rows are written in
    /// one transaction.
    pub async fn create(
        &self,
        request: &CreateAuditRequest,
        template: Option<&[TemplateEntry]>,
    ) -> Result<Audit, sqlx::Error> {
        let timer = QueryTimer::new("create_audit");
        let mut tx = self.scope.pool().begin().await?;

        let entity = sqlx::query_as::<_, AuditEntity>(
            r#"
            INSERT INTO audits (tenant_id, title, audit_type, status, planned_date, scope,
                                objectives, iso_standard, lead_auditor_id)
            VALUES ($1, $2, $3, 'scheduled', $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, title, audit_type, status, planned_date, start_date,
                      end_date, actual_date, scope, objectives, iso_standard, conclusions,
                      lead_auditor_id, created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(request.title.trim())
        .bind(AuditTypeDb::from(request.audit_type))
        .bind(request.planned_date)
        .bind(request.scope.as_deref())
        .bind(request.objectives.as_deref())
        .bind(request.iso_standard.as_deref())
        .bind(request.lead_auditor_id)
        .fetch_one(&mut *tx)
        .await?;

        if !request.responsible_user_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO audit_responsible_users (audit_id, user_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(entity.id)
            .bind(&request.responsible_user_ids)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(entries) = template {
            let positions: Vec<i32> = (0..entries.len() as i32).collect();
            let sections: Vec<&str> = entries.iter().map(|e| e.section).collect();
            let questions: Vec<&str> = entries.iter().map(|e| e.question).collect();

            sqlx::query(
                r#"
                INSERT INTO audit_checklists (audit_id, position, section, question)
                SELECT $1, t.position, t.section, t.question
                FROM UNNEST($2::int[], $3::text[], $4::text[]) AS t(position, section, question)
                "#,
            )
            .bind(entity.id)
            .bind(&positions)
            .bind(&sections)
            .bind(&questions)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(entity.into())
    }

    /// Update descriptive fields. Status is changed through [`Self::update_status`].
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateAuditRequest,
    ) -> Result<Option<Audit>, sqlx::Error> {
        let timer = QueryTimer::new("update_audit");
        let mut tx = self.scope.pool().begin().await?;

        let entity = sqlx::query_as::<_, AuditEntity>(
            r#"
            UPDATE audits
            SET
                title = COALESCE($3, title),
                audit_type = COALESCE($4, audit_type),
                planned_date = COALESCE($5, planned_date),
                scope = COALESCE($6, scope),
                objectives = COALESCE($7, objectives),
                iso_standard = COALESCE($8, iso_standard),
                conclusions = COALESCE($9, conclusions),
                lead_auditor_id = CASE WHEN $11 THEN $10 ELSE lead_auditor_id END,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, title, audit_type, status, planned_date, start_date,
                      end_date, actual_date, scope, objectives, iso_standard, conclusions,
                      lead_auditor_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(request.title.as_deref().map(str::trim))
        .bind(request.audit_type.map(AuditTypeDb::from))
        .bind(request.planned_date)
        .bind(request.scope.as_deref())
        .bind(request.objectives.as_deref())
        .bind(request.iso_standard.as_deref())
        .bind(request.conclusions.as_deref())
        .bind(request.lead_auditor_id.flatten())
        .bind(request.lead_auditor_id.is_some())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        if let Some(user_ids) = &request.responsible_user_ids {
            sqlx::query("DELETE FROM audit_responsible_users WHERE audit_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO audit_responsible_users (audit_id, user_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(user_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Apply a status change computed from the transition table.
    ///
    /// The row is only updated while it still has status `from`; `None` means
    /// the audit is gone or was changed concurrently.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: AuditStatus,
        change: &StatusChange,
    ) -> Result<Option<Audit>, sqlx::Error> {
        let timer = QueryTimer::new("update_audit_status");
        let entity = sqlx::query_as::<_, AuditEntity>(
            r#"
            UPDATE audits
            SET status = $4, start_date = $5, end_date = $6, actual_date = $7, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND status = $3
            RETURNING id, tenant_id, title, audit_type, status, planned_date, start_date,
                      end_date, actual_date, scope, objectives, iso_standard, conclusions,
                      lead_auditor_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(AuditStatusDb::from(from))
        .bind(AuditStatusDb::from(change.status))
        .bind(change.start_date)
        .bind(change.end_date)
        .bind(change.actual_date)
        .fetch_optional(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Delete an audit. Checklist rows and responsible-user links cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM audits WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(self.scope.tenant_id())
            .execute(self.scope.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
