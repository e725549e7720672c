//! Non-conformity routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use domain::models::non_conformity::{
    closed_at_for, AddCorrectiveActionRequest, CreateNonConformityRequest,
    ListNonConformitiesQuery, UpdateNonConformityRequest,
};
use domain::models::Capability;
use shared::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, AuthContext, ValidatedJson};
use crate::middleware::metrics::record_non_conformity_created;
use crate::response::{ApiResponse, Message};

fn not_found() -> ApiError {
    ApiError::NotFound("Non-conformity not found".into())
}

/// List non-conformities.
///
/// GET /api/v1/ncs
pub async fn list_non_conformities(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListNonConformitiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadNonConformities)?;

    let page = PageRequest::new(query.page, query.limit);
    let (items, total) = auth
        .scope(&state.pool)
        .non_conformities()
        .list(&query, page)
        .await?;

    Ok(ApiResponse::paginated(items, page.meta(total)))
}

/// Raise a non-conformity.
///
/// POST /api/v1/ncs
pub async fn create_non_conformity(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateNonConformityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteNonConformities)?;
    let scope = auth.scope(&state.pool);

    if let Some(audit_id) = request.audit_id {
        if scope.audits().find(audit_id).await?.is_none() {
            return Err(ApiError::Validation(
                "Audit does not exist in this tenant".into(),
            ));
        }
    }

    let nc = scope.non_conformities().create(&request).await?;
    record_non_conformity_created(nc.severity.as_str());

    info!(
        tenant_id = %auth.tenant_id,
        nc_id = %nc.id,
        severity = %nc.severity,
        audit_id = ?nc.audit_id,
        "Non-conformity created"
    );

    Ok(ApiResponse::created(nc))
}

/// Get a non-conformity.
///
/// GET /api/v1/ncs/:nc_id
pub async fn get_non_conformity(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(nc_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadNonConformities)?;

    let nc = auth
        .scope(&state.pool)
        .non_conformities()
        .find(nc_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(nc))
}

/// Update a non-conformity; closing stamps `closedAt`, reopening clears it.
///
/// PUT /api/v1/ncs/:nc_id
pub async fn update_non_conformity(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(nc_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateNonConformityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteNonConformities)?;
    let repo = auth.scope(&state.pool).non_conformities();

    let current = repo.find(nc_id).await?.ok_or_else(not_found)?;
    let status = request.status.unwrap_or(current.status);
    let closed_at = closed_at_for(current.status, current.closed_at, status, Utc::now());

    let nc = repo
        .update(nc_id, &request, status, closed_at)
        .await?
        .ok_or_else(not_found)?;

    if current.status != nc.status {
        info!(
            tenant_id = %auth.tenant_id,
            nc_id = %nc_id,
            from = %current.status,
            to = %nc.status,
            "Non-conformity status changed"
        );
    }

    Ok(ApiResponse::ok(nc))
}

/// Delete a non-conformity.
///
/// DELETE /api/v1/ncs/:nc_id
pub async fn delete_non_conformity(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(nc_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteNonConformities)?;

    if !auth
        .scope(&state.pool)
        .non_conformities()
        .delete(nc_id)
        .await?
    {
        return Err(not_found());
    }

    info!(tenant_id = %auth.tenant_id, nc_id = %nc_id, "Non-conformity deleted");
    Ok(Message::new("Non-conformity deleted"))
}

/// Append a corrective action.
///
/// POST /api/v1/ncs/:nc_id/actions
pub async fn add_corrective_action(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(nc_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddCorrectiveActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteNonConformities)?;
    let scope = auth.scope(&state.pool);

    if let Some(responsible_id) = request.responsible_id {
        if !scope.users().all_members(&[responsible_id]).await? {
            return Err(ApiError::Validation(
                "Responsible user must belong to the tenant".into(),
            ));
        }
    }

    let action = request.into_action(Utc::now());
    let nc = scope
        .non_conformities()
        .add_action(nc_id, &action)
        .await?
        .ok_or_else(not_found)?;

    info!(
        tenant_id = %auth.tenant_id,
        nc_id = %nc_id,
        action_id = %action.id,
        "Corrective action added"
    );

    Ok(ApiResponse::created(nc))
}
