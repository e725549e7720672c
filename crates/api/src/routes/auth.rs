//! Authentication routes for tenant registration, login, and token management.

use axum::{extract::State, response::IntoResponse};
use domain::models::{Tenant, User};
use serde::{Deserialize, Serialize};
use shared::jwt::TokenPair;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AuthContext, ValidatedJson};
use crate::middleware::metrics::record_tenant_registered;
use crate::response::ApiResponse;
use crate::services::{AuthService, Registration};

/// Request body for self-service tenant registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 255, message = "Tenant name must be 2-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub tenant_name: String,

    #[validate(custom(function = "shared::validation::validate_subdomain"))]
    pub subdomain: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub full_name: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<TokenPair> for TokensResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer",
            expires_in: pair.expires_in,
        }
    }
}

/// Response data for a successful registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub tenant: Tenant,
    pub admin: User,
    pub tokens: TokensResponse,
}

/// Response data for login and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub tokens: TokensResponse,
}

/// Register a tenant together with its first administrator.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());

    let (tenant, admin, tokens) = service
        .register(Registration {
            tenant_name: &request.tenant_name,
            subdomain: &request.subdomain,
            email: &request.email,
            password: &request.password,
            full_name: &request.full_name,
        })
        .await?;

    record_tenant_registered();

    Ok(ApiResponse::created(RegisterResponse {
        tenant,
        admin,
        tokens: tokens.into(),
    }))
}

/// Sign in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let (user, tokens) = service.login(&request.email, &request.password).await?;

    Ok(ApiResponse::ok(SessionResponse {
        user,
        tokens: tokens.into(),
    }))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let (user, tokens) = service.refresh(&request.refresh_token).await?;

    Ok(ApiResponse::ok(SessionResponse {
        user,
        tokens: tokens.into(),
    }))
}

/// Profile of the authenticated user.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<impl IntoResponse, ApiError> {
    let user = auth
        .scope(&state.pool)
        .users()
        .find(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(ApiResponse::ok(user))
}
