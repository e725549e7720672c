//! KPI routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use domain::models::kpi::{
    CreateKpiRequest, KpiResponse, ListKpisQuery, Measurement, UpdateKpiRequest,
};
use domain::models::Capability;
use shared::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery, AuthContext, ValidatedJson};
use crate::response::{ApiResponse, Message};

fn not_found() -> ApiError {
    ApiError::NotFound("KPI not found".into())
}

/// GET /api/v1/kpis
pub async fn list_kpis(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListKpisQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadKpis)?;

    let page = PageRequest::new(query.page, query.limit);
    let (kpis, total) = auth.scope(&state.pool).kpis().list(&query, page).await?;
    let data: Vec<KpiResponse> = kpis.into_iter().map(KpiResponse::from).collect();

    Ok(ApiResponse::paginated(data, page.meta(total)))
}

/// POST /api/v1/kpis
pub async fn create_kpi(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateKpiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteKpis)?;

    let kpi = auth.scope(&state.pool).kpis().create(&request).await?;
    info!(tenant_id = %auth.tenant_id, kpi_id = %kpi.id, "KPI created");

    Ok(ApiResponse::created(KpiResponse::from(kpi)))
}

/// GET /api/v1/kpis/:kpi_id
pub async fn get_kpi(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(kpi_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadKpis)?;

    let kpi = auth
        .scope(&state.pool)
        .kpis()
        .find(kpi_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(KpiResponse::from(kpi)))
}

/// PUT /api/v1/kpis/:kpi_id
pub async fn update_kpi(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(kpi_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateKpiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteKpis)?;

    let kpi = auth
        .scope(&state.pool)
        .kpis()
        .update(kpi_id, &request)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(KpiResponse::from(kpi)))
}

/// DELETE /api/v1/kpis/:kpi_id
pub async fn delete_kpi(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(kpi_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteKpis)?;

    if !auth.scope(&state.pool).kpis().delete(kpi_id).await? {
        return Err(not_found());
    }

    info!(tenant_id = %auth.tenant_id, kpi_id = %kpi_id, "KPI deleted");
    Ok(Message::new("KPI deleted"))
}

/// Append a measurement.
///
/// POST /api/v1/kpis/:kpi_id/measurements
pub async fn add_measurement(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(kpi_id): Path<Uuid>,
    ApiJson(measurement): ApiJson<Measurement>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteKpis)?;

    if !measurement.value.is_finite() {
        return Err(ApiError::Validation("Value must be a finite number".into()));
    }

    let kpi = auth
        .scope(&state.pool)
        .kpis()
        .add_measurement(kpi_id, &measurement)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::created(KpiResponse::from(kpi)))
}
