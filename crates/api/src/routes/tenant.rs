//! Routes for the caller's own tenant.

use axum::{extract::State, response::IntoResponse};
use domain::models::tenant::UpdateTenantRequest;
use domain::models::Capability;
use persistence::repositories::TenantRepository;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AuthContext, ValidatedJson};
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound("Tenant not found".into())
}

/// GET /api/v1/tenant
pub async fn get_tenant(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = TenantRepository::new(state.pool.clone())
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(tenant))
}

/// Rename the tenant or change its plan.
///
/// PUT /api/v1/tenant
pub async fn update_tenant(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageTenantSettings)?;

    let tenant = TenantRepository::new(state.pool.clone())
        .update(
            auth.tenant_id,
            request.name.as_deref().map(str::trim),
            request.plan,
        )
        .await?
        .ok_or_else(not_found)?;

    info!(
        tenant_id = %tenant.id,
        plan = %tenant.plan,
        updated_by = %auth.user_id,
        "Tenant updated"
    );

    Ok(ApiResponse::ok(tenant))
}
