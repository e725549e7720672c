//! Tenant dashboard route.

use axum::{extract::State, response::IntoResponse};
use domain::models::Capability;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;
use crate::response::ApiResponse;

/// Aggregated counters for the caller's tenant.
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ViewDashboard)?;

    let metrics = auth.scope(&state.pool).dashboard().get_metrics().await?;
    Ok(ApiResponse::ok(metrics))
}
