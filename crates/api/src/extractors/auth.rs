//! Authenticated caller extractor.
//!
//! Resolves the bearer token into the identity and capabilities a request is
//! evaluated against, and hands out the [`TenantScope`] for data access.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use domain::models::{Capability, CapabilitySet, Role};
use persistence::TenantScope;
use shared::jwt::{Claims, JwtConfig};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// The verified caller of a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: Role,
    capabilities: CapabilitySet,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, ApiError> {
        let role = Role::from_str(&claims.role)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".into()))?;

        Ok(Self {
            user_id: claims.user_id()?,
            tenant_id: claims.tenant_id()?,
            email: claims.email.clone(),
            role,
            capabilities: role.capabilities(),
        })
    }

    /// Validates an access token and builds the context.
    pub fn authenticate(jwt: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt.validate_access_token(token)?;
        Self::from_claims(&claims)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Fails with 403 unless the caller's role grants `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), ApiError> {
        if self.can(capability) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %self.user_id,
                role = %self.role,
                capability = ?capability,
                "Capability denied"
            );
            Err(ApiError::Forbidden("Insufficient permissions".into()))
        }
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Data access bound to the caller's tenant.
    pub fn scope(&self, pool: &PgPool) -> TenantScope {
        TenantScope::new(pool.clone(), self.tenant_id)
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".into()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the auth middleware
        if let Some(auth) = parts.extensions.get::<AuthContext>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(&parts.headers)?;
        AuthContext::authenticate(&state.jwt, token)
    }
}
