//! Tenant user management routes.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use domain::models::user::{
    normalize_email, CreateUserRequest, ListUsersQuery, NewUser, UpdateUserRequest,
};
use domain::models::{Capability, Role, User};
use persistence::repositories::AccountRepository;
use shared::pagination::PageRequest;
use shared::password::{check_password_policy, hash_password};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiQuery, AuthContext, ValidatedJson};
use crate::response::ApiResponse;
use crate::services::AuthError;

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".into())
}

fn ensure_can_assign(auth: &AuthContext, role: Role) -> Result<(), ApiError> {
    if auth.role.can_assign(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("Cannot assign role {}", role)))
    }
}

/// Rules a caller must satisfy when editing their own account.
fn check_self_update(
    auth: &AuthContext,
    target: &User,
    request: &UpdateUserRequest,
) -> Result<(), ApiError> {
    if target.id != auth.user_id {
        return Ok(());
    }
    if request.is_active == Some(false) {
        return Err(ApiError::Forbidden(
            "You cannot deactivate your own account".into(),
        ));
    }
    if request.role.is_some_and(|role| role != target.role) {
        return Err(ApiError::Forbidden("You cannot change your own role".into()));
    }
    Ok(())
}

/// List users of the tenant.
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ViewUsers)?;

    let page = PageRequest::new(query.page, query.limit);
    let (users, total) = auth.scope(&state.pool).users().list(&query, page).await?;

    Ok(ApiResponse::paginated(users, page.meta(total)))
}

/// Create a user in the caller's tenant.
///
/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageUsers)?;
    ensure_can_assign(&auth, request.role)?;

    let email = normalize_email(&request.email);
    if AccountRepository::new(state.pool.clone())
        .email_exists(&email)
        .await?
    {
        return Err(AuthError::EmailTaken.into());
    }

    check_password_policy(&request.password).map_err(AuthError::from)?;
    let password_hash = hash_password(&request.password).map_err(AuthError::from)?;

    let user = auth
        .scope(&state.pool)
        .users()
        .create(&NewUser {
            email,
            password_hash,
            full_name: request.full_name.trim().to_string(),
            role: request.role,
        })
        .await?;

    info!(
        tenant_id = %auth.tenant_id,
        user_id = %user.id,
        role = %user.role,
        created_by = %auth.user_id,
        "User created"
    );

    Ok(ApiResponse::created(user))
}

/// GET /api/v1/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if user_id != auth.user_id {
        auth.require(Capability::ViewUsers)?;
    }

    let user = auth
        .scope(&state.pool)
        .users()
        .find(user_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(ApiResponse::ok(user))
}

/// Update a user's name, role or active flag.
///
/// PUT /api/v1/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageUsers)?;
    let users = auth.scope(&state.pool).users();

    let target = users.find(user_id).await?.ok_or_else(not_found)?;
    check_self_update(&auth, &target, &request)?;

    // Super admin accounts are only editable by super admins
    ensure_can_assign(&auth, target.role)?;
    if let Some(role) = request.role {
        ensure_can_assign(&auth, role)?;
    }

    let user = users
        .update(
            user_id,
            request.full_name.as_deref().map(str::trim),
            request.role,
            request.is_active,
        )
        .await?
        .ok_or_else(not_found)?;

    info!(
        tenant_id = %auth.tenant_id,
        user_id = %user.id,
        role = %user.role,
        is_active = user.is_active,
        updated_by = %auth.user_id,
        "User updated"
    );

    Ok(ApiResponse::ok(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::jwt::{Claims, TokenType};

    fn user(id: Uuid, role: Role) -> User {
        User {
            id,
            tenant_id: Uuid::new_v4(),
            email: "someone@acme.test".into(),
            password_hash: String::new(),
            full_name: "Someone".into(),
            role,
            is_active: true,
            email_verified: false,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn auth_for(target: &User) -> AuthContext {
        let claims = Claims {
            sub: target.id.to_string(),
            tenant_id: target.tenant_id.to_string(),
            email: target.email.clone(),
            role: target.role.as_str().into(),
            exp: 0,
            iat: 0,
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        };
        AuthContext::from_claims(&claims).unwrap()
    }

    fn request(role: Option<Role>, is_active: Option<bool>) -> UpdateUserRequest {
        UpdateUserRequest {
            full_name: None,
            role,
            is_active,
        }
    }

    #[test]
    fn test_cannot_deactivate_self() {
        let me = user(Uuid::new_v4(), Role::TenantAdmin);
        let auth = auth_for(&me);
        let err = check_self_update(&auth, &me, &request(None, Some(false))).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_cannot_demote_self() {
        let me = user(Uuid::new_v4(), Role::TenantAdmin);
        let auth = auth_for(&me);
        assert!(check_self_update(&auth, &me, &request(Some(Role::Auditor), None)).is_err());
        assert!(check_self_update(&auth, &me, &request(Some(Role::TenantAdmin), None)).is_ok());
    }

    #[test]
    fn test_other_users_are_not_restricted_by_self_rules() {
        let me = user(Uuid::new_v4(), Role::TenantAdmin);
        let other = user(Uuid::new_v4(), Role::Auditor);
        let auth = auth_for(&me);
        assert!(check_self_update(&auth, &other, &request(Some(Role::User), Some(false))).is_ok());
    }

    #[test]
    fn test_tenant_admin_cannot_assign_super_admin() {
        let me = user(Uuid::new_v4(), Role::TenantAdmin);
        let auth = auth_for(&me);
        assert!(ensure_can_assign(&auth, Role::SuperAdmin).is_err());
        assert!(ensure_can_assign(&auth, Role::Consultant).is_ok());
    }
}
