//! Audit routes: planning, lifecycle and checklist execution.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use domain::models::audit::{
    AuditDetail, CreateAuditRequest, ListAuditsQuery, UpdateAuditRequest,
    UpdateAuditStatusRequest,
};
use domain::models::checklist::{AddEvidenceRequest, UpdateChecklistItemRequest};
use domain::models::standard::{supported_standards, template_for};
use domain::models::Capability;
use persistence::repositories::UserRepository;
use shared::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery, AuthContext, ValidatedJson};
use crate::middleware::metrics::record_audit_created;
use crate::response::{ApiResponse, Message};

fn audit_not_found() -> ApiError {
    ApiError::NotFound("Audit not found".into())
}

/// Users an audit request points at: the lead auditor and the responsible users.
fn referenced_users(lead_auditor_id: Option<Uuid>, responsible: &[Uuid]) -> Vec<Uuid> {
    lead_auditor_id
        .into_iter()
        .chain(responsible.iter().copied())
        .collect()
}

async fn ensure_members(users: &UserRepository, ids: &[Uuid]) -> Result<(), ApiError> {
    if users.all_members(ids).await? {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Lead auditor and responsible users must belong to the tenant".into(),
        ))
    }
}

/// List audits.
///
/// GET /api/v1/audits
pub async fn list_audits(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListAuditsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadAudits)?;

    let page = PageRequest::new(query.page, query.limit);
    let (audits, total) = auth.scope(&state.pool).audits().list(&query, page).await?;

    Ok(ApiResponse::paginated(audits, page.meta(total)))
}

/// Standards with a checklist template.
///
/// GET /api/v1/audits/standards
pub async fn list_standards(auth: AuthContext) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadAudits)?;
    Ok(ApiResponse::ok(supported_standards()))
}

/// Plan an audit, optionally seeding its checklist from a standard.
///
/// POST /api/v1/audits
pub async fn create_audit(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateAuditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteAudits)?;
    let scope = auth.scope(&state.pool);

    ensure_members(
        &scope.users(),
        &referenced_users(request.lead_auditor_id, &request.responsible_user_ids),
    )
    .await?;

    // Resolved before anything is written so an unknown standard persists nothing
    let template = if request.populate_from_standard {
        Some(template_for(request.iso_standard.as_deref().unwrap_or_default())?)
    } else {
        None
    };

    let audit = scope.audits().create(&request, template).await?;
    record_audit_created(template.is_some());

    info!(
        tenant_id = %auth.tenant_id,
        audit_id = %audit.id,
        checklist_items = template.map_or(0, <[_]>::len),
        "Audit created"
    );

    Ok(ApiResponse::created(audit))
}

/// Audit with its sorted checklist and responsible users.
///
/// GET /api/v1/audits/:audit_id
pub async fn get_audit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(audit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadAudits)?;
    let scope = auth.scope(&state.pool);

    let audit = scope
        .audits()
        .find(audit_id)
        .await?
        .ok_or_else(audit_not_found)?;
    let responsible_user_ids = scope.audits().responsible_user_ids(audit_id).await?;
    let checklists = scope.checklists().list_for_audit(audit_id).await?;

    Ok(ApiResponse::ok(AuditDetail {
        audit,
        responsible_user_ids,
        checklists,
    }))
}

/// Update descriptive fields of an audit.
///
/// PUT /api/v1/audits/:audit_id
pub async fn update_audit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(audit_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateAuditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteAudits)?;
    let scope = auth.scope(&state.pool);

    ensure_members(
        &scope.users(),
        &referenced_users(
            request.lead_auditor_id.flatten(),
            request.responsible_user_ids.as_deref().unwrap_or_default(),
        ),
    )
    .await?;

    let audit = scope
        .audits()
        .update(audit_id, &request)
        .await?
        .ok_or_else(audit_not_found)?;

    info!(tenant_id = %auth.tenant_id, audit_id = %audit.id, "Audit updated");
    Ok(ApiResponse::ok(audit))
}

/// Move an audit along its lifecycle.
///
/// POST /api/v1/audits/:audit_id/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(audit_id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateAuditStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteAudits)?;
    let audits = auth.scope(&state.pool).audits();

    let audit = audits.find(audit_id).await?.ok_or_else(audit_not_found)?;
    let change = audit.transition(request.status, Utc::now().naive_utc())?;

    let updated = audits
        .update_status(audit_id, audit.status, &change)
        .await?
        .ok_or_else(|| ApiError::Conflict("Audit status was changed concurrently".into()))?;

    info!(
        tenant_id = %auth.tenant_id,
        audit_id = %audit_id,
        from = %audit.status,
        to = %updated.status,
        "Audit status changed"
    );

    Ok(ApiResponse::ok(updated))
}

/// Delete an audit and its checklist.
///
/// DELETE /api/v1/audits/:audit_id
pub async fn delete_audit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(audit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteAudits)?;

    if !auth.scope(&state.pool).audits().delete(audit_id).await? {
        return Err(audit_not_found());
    }

    info!(tenant_id = %auth.tenant_id, audit_id = %audit_id, "Audit deleted");
    Ok(Message::new("Audit deleted"))
}

/// Checklist of an audit in section order.
///
/// GET /api/v1/audits/:audit_id/checklists
pub async fn list_checklist(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(audit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadAudits)?;
    let scope = auth.scope(&state.pool);

    if scope.audits().find(audit_id).await?.is_none() {
        return Err(audit_not_found());
    }
    let items = scope.checklists().list_for_audit(audit_id).await?;

    Ok(ApiResponse::ok(items))
}

/// Record a verdict or notes on a checklist row.
///
/// PATCH /api/v1/audits/:audit_id/checklists/:item_id
pub async fn update_checklist_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((audit_id, item_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateChecklistItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ExecuteChecklists)?;

    let item = auth
        .scope(&state.pool)
        .checklists()
        .update(audit_id, item_id, request.status, request.notes.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Checklist item not found".into()))?;

    info!(
        tenant_id = %auth.tenant_id,
        audit_id = %audit_id,
        item_id = %item_id,
        status = ?item.status,
        "Checklist item updated"
    );

    Ok(ApiResponse::ok(item))
}

/// Attach evidence to a checklist row.
///
/// POST /api/v1/audits/:audit_id/checklists/:item_id/evidence
pub async fn add_evidence(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((audit_id, item_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<AddEvidenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ExecuteChecklists)?;

    let evidence = request.into_evidence(Utc::now());
    let item = auth
        .scope(&state.pool)
        .checklists()
        .add_evidence(audit_id, item_id, &evidence)
        .await?
        .ok_or_else(|| ApiError::NotFound("Checklist item not found".into()))?;

    Ok(ApiResponse::created(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_users_includes_lead_first() {
        let lead = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(referenced_users(Some(lead), &[other]), vec![lead, other]);
    }

    #[test]
    fn test_referenced_users_without_lead() {
        let other = Uuid::new_v4();
        assert_eq!(referenced_users(None, &[other]), vec![other]);
        assert!(referenced_users(None, &[]).is_empty());
    }
}
