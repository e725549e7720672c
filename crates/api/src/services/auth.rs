//! Account registration, sign-in and token refresh.

use chrono::{Duration, Utc};
use domain::models::tenant::{NewTenant, TenantPlan, TenantStatus, TRIAL_DAYS};
use domain::models::user::{normalize_email, NewUser};
use domain::models::{Role, Tenant, User};
use persistence::repositories::{AccountRepository, TenantRepository};
use shared::jwt::{JwtConfig, JwtError, TokenPair, TokenSubject};
use shared::password::{check_password_policy, hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Subdomain is already taken")]
    SubdomainTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Tenant is not active")]
    TenantInactive,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SubdomainTaken | AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::InvalidRefreshToken => ApiError::Unauthorized(err.to_string()),
            AuthError::TenantInactive => ApiError::Forbidden(err.to_string()),
            AuthError::Password(PasswordError::TooShort(_) | PasswordError::TooLong(_)) => {
                ApiError::Validation(err.to_string())
            }
            AuthError::Password(e) => ApiError::Upstream(e.to_string()),
            AuthError::Token(e) => ApiError::from(e),
            AuthError::Database(e) => ApiError::from(e),
        }
    }
}

/// Input of a self-service registration, already validated.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub tenant_name: &'a str,
    pub subdomain: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

/// Authentication service.
pub struct AuthService {
    accounts: AccountRepository,
    tenants: TenantRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            tenants: TenantRepository::new(pool),
            jwt,
        }
    }

    /// Creates a trial tenant and its first administrator in one transaction.
    pub async fn register(
        &self,
        registration: Registration<'_>,
    ) -> Result<(Tenant, User, TokenPair), AuthError> {
        check_password_policy(registration.password)?;

        let email = normalize_email(registration.email);
        let subdomain = registration.subdomain.trim().to_lowercase();

        if self.tenants.subdomain_exists(&subdomain).await? {
            return Err(AuthError::SubdomainTaken);
        }
        if self.accounts.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(registration.password)?;

        let new_tenant = NewTenant {
            name: registration.tenant_name.trim().to_string(),
            subdomain,
            plan: TenantPlan::Free,
            status: TenantStatus::Trial,
            trial_ends_at: Some(Utc::now() + Duration::days(TRIAL_DAYS)),
        };
        let admin = NewUser {
            email,
            password_hash,
            full_name: registration.full_name.trim().to_string(),
            role: Role::TenantAdmin,
        };

        let (tenant, user) = self.accounts.register(&new_tenant, &admin).await?;
        let tokens = self.issue(&user)?;

        tracing::info!(
            tenant_id = %tenant.id,
            user_id = %user.id,
            subdomain = %tenant.subdomain,
            "Tenant registered"
        );

        Ok((tenant, user, tokens))
    }

    /// Verifies credentials and stamps the sign-in.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let user = self
            .accounts
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.ensure_can_sign_in(&user).await?;
        self.accounts.touch_last_login(user.id).await?;

        let tokens = self.issue(&user)?;
        tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "User logged in");
        Ok((user, tokens))
    }

    /// Exchanges a refresh token for a new pair after re-reading the user.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id = claims
            .user_id()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.ensure_can_sign_in(&user).await?;

        let tokens = self.issue(&user)?;
        Ok((user, tokens))
    }

    async fn ensure_can_sign_in(&self, user: &User) -> Result<(), AuthError> {
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        let tenant = self.tenants.find_by_id(user.tenant_id).await?;
        match tenant {
            Some(t) if t.status.allows_login() => Ok(()),
            _ => Err(AuthError::TenantInactive),
        }
    }

    fn issue(&self, user: &User) -> Result<TokenPair, AuthError> {
        let subject = TokenSubject {
            user_id: user.id,
            tenant_id: user.tenant_id,
            email: &user.email,
            role: user.role.as_str(),
        };
        Ok(self.jwt.issue_pair(&subject)?)
    }
}
