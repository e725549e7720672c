//! Risk register routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use domain::models::risk::{CreateRiskRequest, ListRisksQuery, RiskResponse, UpdateRiskRequest};
use domain::models::Capability;
use shared::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, AuthContext, ValidatedJson};
use crate::response::{ApiResponse, Message};

fn not_found() -> ApiError {
    ApiError::NotFound("Risk not found".into())
}

async fn ensure_owner_member(
    state: &AppState,
    auth: &AuthContext,
    owner_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(owner_id) = owner_id else {
        return Ok(());
    };
    if auth.scope(&state.pool).users().all_members(&[owner_id]).await? {
        Ok(())
    } else {
        Err(ApiError::Validation("Risk owner must belong to the tenant".into()))
    }
}

/// List risks, highest score first.
///
/// GET /api/v1/risks
pub async fn list_risks(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListRisksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadRisks)?;

    let page = PageRequest::new(query.page, query.limit);
    let (risks, total) = auth.scope(&state.pool).risks().list(&query, page).await?;
    let data: Vec<RiskResponse> = risks.into_iter().map(RiskResponse::from).collect();

    Ok(ApiResponse::paginated(data, page.meta(total)))
}

/// POST /api/v1/risks
pub async fn create_risk(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateRiskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteRisks)?;
    ensure_owner_member(&state, &auth, request.owner_id).await?;

    let risk = RiskResponse::from(auth.scope(&state.pool).risks().create(&request).await?);
    info!(
        tenant_id = %auth.tenant_id,
        risk_id = %risk.risk.id,
        score = risk.score,
        "Risk registered"
    );

    Ok(ApiResponse::created(risk))
}

/// GET /api/v1/risks/:risk_id
pub async fn get_risk(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(risk_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadRisks)?;

    let risk = auth
        .scope(&state.pool)
        .risks()
        .find(risk_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(RiskResponse::from(risk)))
}

/// PUT /api/v1/risks/:risk_id
pub async fn update_risk(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(risk_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateRiskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteRisks)?;
    ensure_owner_member(&state, &auth, request.owner_id).await?;

    let risk = auth
        .scope(&state.pool)
        .risks()
        .update(risk_id, &request)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(RiskResponse::from(risk)))
}

/// DELETE /api/v1/risks/:risk_id
pub async fn delete_risk(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(risk_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteRisks)?;

    if !auth.scope(&state.pool).risks().delete(risk_id).await? {
        return Err(not_found());
    }

    info!(tenant_id = %auth.tenant_id, risk_id = %risk_id, "Risk deleted");
    Ok(Message::new("Risk deleted"))
}
