//! Platform administration routes: tenants and global configuration.
//!
//! Every handler requires a super admin capability.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use domain::models::system_config::{
    is_valid_config_key, SystemConfigEntry, UpsertSystemConfigRequest,
};
use domain::models::tenant::{ListTenantsQuery, UpdateTenantStatusRequest};
use domain::models::Capability;
use persistence::repositories::{SystemConfigRepository, TenantRepository};
use shared::pagination::PageRequest;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery, AuthContext, ValidatedJson};
use crate::response::{ApiResponse, Message};

fn tenant_not_found() -> ApiError {
    ApiError::NotFound("Tenant not found".into())
}

fn check_key(key: &str) -> Result<(), ApiError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Config key must be 1-100 characters of letters, digits, '.', '_' or '-'".into(),
        ))
    }
}

/// List all tenants.
///
/// GET /api/v1/admin/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListTenantsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageTenants)?;

    let page = PageRequest::new(query.page, query.limit);
    let (tenants, total) = TenantRepository::new(state.pool.clone())
        .list(&query, page)
        .await?;

    Ok(ApiResponse::paginated(tenants, page.meta(total)))
}

/// Hard-delete a tenant and everything it owns.
///
/// DELETE /api/v1/admin/tenants/:tenant_id
pub async fn delete_tenant(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageTenants)?;
    let repo = TenantRepository::new(state.pool.clone());

    let tenant = repo
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(tenant_not_found)?;
    if tenant.is_system() {
        warn!(admin_id = %auth.user_id, "Attempt to delete the system tenant");
        return Err(ApiError::Forbidden("The system tenant cannot be deleted".into()));
    }

    if !repo.delete(tenant_id).await? {
        return Err(tenant_not_found());
    }

    info!(
        tenant_id = %tenant_id,
        subdomain = %tenant.subdomain,
        admin_id = %auth.user_id,
        "Tenant deleted"
    );

    Ok(Message::new("Tenant deleted"))
}

/// Suspend, reactivate or cancel a tenant.
///
/// PUT /api/v1/admin/tenants/:tenant_id/status
pub async fn update_tenant_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(tenant_id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateTenantStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageTenants)?;

    let repo = TenantRepository::new(state.pool.clone());
    let current = repo.find_by_id(tenant_id).await?.ok_or_else(tenant_not_found)?;
    if current.is_system() {
        warn!(admin_id = %auth.user_id, "Attempt to change the system tenant status");
        return Err(ApiError::Forbidden(
            "The system tenant status cannot be changed".into(),
        ));
    }

    let tenant = repo
        .update_status(tenant_id, request.status)
        .await?
        .ok_or_else(tenant_not_found)?;

    info!(
        tenant_id = %tenant.id,
        status = %tenant.status,
        admin_id = %auth.user_id,
        "Tenant status changed"
    );

    Ok(ApiResponse::ok(tenant))
}

/// Global configuration, secrets masked.
///
/// GET /api/v1/admin/config
pub async fn list_config(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageSystemConfig)?;

    let entries: Vec<SystemConfigEntry> = SystemConfigRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(SystemConfigEntry::masked)
        .collect();

    Ok(ApiResponse::ok(entries))
}

/// Create or replace a configuration entry.
///
/// PUT /api/v1/admin/config/:key
pub async fn upsert_config(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(key): Path<String>,
    ValidatedJson(request): ValidatedJson<UpsertSystemConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageSystemConfig)?;
    check_key(&key)?;

    let entry = SystemConfigRepository::new(state.pool.clone())
        .upsert(
            &key,
            &request.value,
            request.description.as_deref(),
            request.is_secret,
        )
        .await?;

    info!(
        key = %entry.key,
        is_secret = entry.is_secret,
        admin_id = %auth.user_id,
        "System config updated"
    );
    Ok(ApiResponse::ok(entry.masked()))
}

/// DELETE /api/v1/admin/config/:key
pub async fn delete_config(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageSystemConfig)?;
    check_key(&key)?;

    if !SystemConfigRepository::new(state.pool.clone())
        .delete(&key)
        .await?
    {
        return Err(ApiError::NotFound("Config entry not found".into()));
    }

    info!(key = %key, admin_id = %auth.user_id, "System config deleted");
    Ok(Message::new("Config entry deleted"))
}
