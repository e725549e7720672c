//! Audit checklist repository for database operations.

use domain::models::checklist::{sort_checklist, ChecklistItem, ChecklistStatus, Evidence};
use sqlx::types::Json;
use uuid::Uuid;

use crate::entities::{ChecklistEntity, ChecklistStatusDb};
use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for checklist rows of the tenant's audits.
#[derive(Clone)]
pub struct ChecklistRepository {
    scope: TenantScope,
}

impl ChecklistRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// Checklist of an audit, in natural section order.
    pub async fn list_for_audit(&self, audit_id: Uuid) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        let timer = QueryTimer::new("list_checklist_items");
        let entities = sqlx::query_as::<_, ChecklistEntity>(
            r#"
            SELECT c.id, c.audit_id, c.position, c.section, c.question, c.status, c.notes,
                   c.evidence, c.created_at, c.updated_at
            FROM audit_checklists c
            JOIN audits a ON a.id = c.audit_id
            WHERE c.audit_id = $1 AND a.tenant_id = $2
            "#,
        )
        .bind(audit_id)
        .bind(self.scope.tenant_id())
        .fetch_all(self.scope.pool())
        .await?;
        timer.record();

        let mut items: Vec<ChecklistItem> = entities.into_iter().map(Into::into).collect();
        sort_checklist(&mut items);
        Ok(items)
    }

    /// Update a checklist row's verdict and notes.
    ///
    /// `status` of `None` leaves the verdict unchanged, `Some(None)` clears it.
    pub async fn update(
        &self,
        audit_id: Uuid,
        item_id: Uuid,
        status: Option<Option<ChecklistStatus>>,
        notes: Option<&str>,
    ) -> Result<Option<ChecklistItem>, sqlx::Error> {
        let timer = QueryTimer::new("update_checklist_item");
        let set_status = status.is_some();
        let new_status = status.flatten().map(ChecklistStatusDb::from);

        let entity = sqlx::query_as::<_, ChecklistEntity>(
            r#"
            UPDATE audit_checklists c
            SET
                status = CASE WHEN $4 THEN $5 ELSE c.status END,
                notes = COALESCE($6, c.notes),
                updated_at = NOW()
            FROM audits a
            WHERE c.id = $1 AND c.audit_id = $2 AND a.id = c.audit_id AND a.tenant_id = $3
            RETURNING c.id, c.audit_id, c.position, c.section, c.question, c.status, c.notes,
                      c.evidence, c.created_at, c.updated_at
            "#,
        )
        .bind(item_id)
        .bind(audit_id)
        .bind(self.scope.tenant_id())
        .bind(set_status)
        .bind(new_status)
        .bind(notes)
        .fetch_optional(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Append one evidence entry to a checklist row.
    pub async fn add_evidence(
        &self,
        audit_id: Uuid,
        item_id: Uuid,
        evidence: &Evidence,
    ) -> Result<Option<ChecklistItem>, sqlx::Error> {
        let entity = sqlx::query_as::<_, ChecklistEntity>(
            r#"
            UPDATE audit_checklists c
            SET evidence = c.evidence || $4, updated_at = NOW()
            FROM audits a
            WHERE c.id = $1 AND c.audit_id = $2 AND a.id = c.audit_id AND a.tenant_id = $3
            RETURNING c.id, c.audit_id, c.position, c.section, c.question, c.status, c.notes,
                      c.evidence, c.created_at, c.updated_at
            "#,
        )
        .bind(item_id)
        .bind(audit_id)
        .bind(self.scope.tenant_id())
        .bind(Json(vec![evidence]))
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }
}
