//! Controlled document routes: metadata, lifecycle, versions, grants and comments.
//!
//! Access to a single document is resolved per request: an explicit grant for
//! the caller replaces the level their role would give them.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use domain::models::document::{
    effective_level, next_review_from, CreateCommentRequest, CreateDocumentRequest,
    CreateVersionRequest, GrantPermissionRequest, ListDocumentsQuery, UpdateDocumentRequest,
    UpdateDocumentStatusRequest,
};
use domain::models::{Capability, Document, PermissionLevel};
use persistence::repositories::DocumentRepository;
use shared::pagination::PageRequest;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiQuery, AuthContext, ValidatedJson};
use crate::response::{ApiResponse, Message};

fn document_not_found() -> ApiError {
    ApiError::NotFound("Document not found".into())
}

fn insufficient_access() -> ApiError {
    ApiError::Forbidden("Insufficient document access".into())
}

/// Loads a document and the caller's effective level on it.
async fn load_with_access(
    repo: &DocumentRepository,
    auth: &AuthContext,
    document_id: Uuid,
) -> Result<(Document, Option<PermissionLevel>), ApiError> {
    let document = repo
        .find(document_id)
        .await?
        .ok_or_else(document_not_found)?;
    let explicit = repo.permission_for(document_id, auth.user_id).await?;

    Ok((document, effective_level(explicit, auth.capabilities())))
}

/// Loads a document and fails with 403 below `needed`.
async fn load_requiring(
    repo: &DocumentRepository,
    auth: &AuthContext,
    document_id: Uuid,
    needed: PermissionLevel,
) -> Result<(Document, PermissionLevel), ApiError> {
    let (document, level) = load_with_access(repo, auth, document_id).await?;
    match level {
        Some(level) if level >= needed => Ok((document, level)),
        _ => Err(insufficient_access()),
    }
}

async fn ensure_member(
    state: &AppState,
    auth: &AuthContext,
    user_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(user_id) = user_id else {
        return Ok(());
    };
    if auth.scope(&state.pool).users().all_members(&[user_id]).await? {
        Ok(())
    } else {
        Err(ApiError::Validation("User must belong to the tenant".into()))
    }
}

/// List documents.
///
/// GET /api/v1/documents
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(query): ApiQuery<ListDocumentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ReadDocuments)?;

    let page = PageRequest::new(query.page, query.limit);
    let (documents, total) = auth
        .scope(&state.pool)
        .documents()
        .list(&query, page)
        .await?;

    Ok(ApiResponse::paginated(documents, page.meta(total)))
}

/// Register a stored file as a draft document.
///
/// POST /api/v1/documents
pub async fn create_document(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(request): ValidatedJson<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::WriteDocuments)?;
    ensure_member(&state, &auth, request.responsible_id).await?;

    let next_review_date = request.next_review_date.or_else(|| {
        next_review_from(Utc::now().date_naive(), request.review_cycle_months)
    });

    let document = auth
        .scope(&state.pool)
        .documents()
        .create(&request, auth.user_id, next_review_date)
        .await?;

    info!(
        tenant_id = %auth.tenant_id,
        document_id = %document.id,
        version = %document.current_version,
        "Document registered"
    );

    Ok(ApiResponse::created(document))
}

/// Get a document.
///
/// GET /api/v1/documents/:document_id
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    let (document, _) = load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    Ok(ApiResponse::ok(document))
}

/// Update document metadata.
///
/// PUT /api/v1/documents/:document_id
pub async fn update_document(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Write).await?;
    ensure_member(&state, &auth, request.responsible_id).await?;

    let document = repo
        .update(document_id, &request)
        .await?
        .ok_or_else(document_not_found)?;

    Ok(ApiResponse::ok(document))
}

/// Delete a document with its versions, grants and comments.
///
/// DELETE /api/v1/documents/:document_id
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Write).await?;

    if !repo.delete(document_id).await? {
        return Err(document_not_found());
    }

    info!(tenant_id = %auth.tenant_id, document_id = %document_id, "Document deleted");
    Ok(Message::new("Document deleted"))
}

/// Move a document along its lifecycle.
///
/// POST /api/v1/documents/:document_id/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateDocumentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    let (document, level) = load_with_access(&repo, &auth, document_id).await?;
    let level = level.ok_or_else(insufficient_access)?;

    let change = document
        .transition(request.status, level, auth.user_id, Utc::now())?
        .ok_or_else(insufficient_access)?;

    let updated = repo
        .update_status(document_id, document.status, &change)
        .await?
        .ok_or_else(|| ApiError::Conflict("Document status was changed concurrently".into()))?;

    info!(
        tenant_id = %auth.tenant_id,
        document_id = %document_id,
        from = %document.status,
        to = %updated.status,
        "Document status changed"
    );

    Ok(ApiResponse::ok(updated))
}

/// Version history, oldest first.
///
/// GET /api/v1/documents/:document_id/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    Ok(ApiResponse::ok(repo.versions(document_id).await?))
}

/// Append a version and make it current.
///
/// POST /api/v1/documents/:document_id/versions
pub async fn add_version(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateVersionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Write).await?;

    let version = repo
        .add_version(document_id, &request, auth.user_id)
        .await?
        .ok_or_else(document_not_found)?;

    info!(
        tenant_id = %auth.tenant_id,
        document_id = %document_id,
        version = %version.version,
        "Document version added"
    );

    Ok(ApiResponse::created(version))
}

/// Explicit grants on a document.
///
/// GET /api/v1/documents/:document_id/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    Ok(ApiResponse::ok(repo.permissions(document_id).await?))
}

/// Grant or change a user's level on a document.
///
/// PUT /api/v1/documents/:document_id/permissions
pub async fn grant_permission(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
    ApiJson(request): ApiJson<GrantPermissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageDocumentPermissions)?;
    let repo = auth.scope(&state.pool).documents();

    if repo.find(document_id).await?.is_none() {
        return Err(document_not_found());
    }
    ensure_member(&state, &auth, Some(request.user_id)).await?;

    let permission = repo
        .upsert_permission(document_id, request.user_id, request.permission, auth.user_id)
        .await?
        .ok_or_else(document_not_found)?;

    info!(
        tenant_id = %auth.tenant_id,
        document_id = %document_id,
        user_id = %request.user_id,
        permission = %permission.permission,
        "Document permission granted"
    );

    Ok(ApiResponse::ok(permission))
}

/// Remove a user's explicit grant.
///
/// DELETE /api/v1/documents/:document_id/permissions/:user_id
pub async fn revoke_permission(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((document_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require(Capability::ManageDocumentPermissions)?;

    if !auth
        .scope(&state.pool)
        .documents()
        .delete_permission(document_id, user_id)
        .await?
    {
        return Err(ApiError::NotFound("Permission not found".into()));
    }

    info!(
        tenant_id = %auth.tenant_id,
        document_id = %document_id,
        user_id = %user_id,
        "Document permission revoked"
    );

    Ok(Message::new("Permission revoked"))
}

/// Comments and replies of a document.
///
/// GET /api/v1/documents/:document_id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    Ok(ApiResponse::ok(repo.comments(document_id).await?))
}

/// Comment on a document or reply to a top-level comment.
///
/// POST /api/v1/documents/:document_id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(document_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    if let Some(parent_id) = request.parent_id {
        let accepts = repo
            .find_comment(document_id, parent_id)
            .await?
            .is_some_and(|parent| parent.accepts_replies(document_id));
        if !accepts {
            return Err(ApiError::Validation(
                "Replies must target a top-level comment of the same document".into(),
            ));
        }
    }

    let comment = repo
        .add_comment(document_id, auth.user_id, &request.content, request.parent_id)
        .await?
        .ok_or_else(document_not_found)?;

    Ok(ApiResponse::created(comment))
}

/// Delete a comment; allowed for its author or approvers of the document.
///
/// DELETE /api/v1/documents/:document_id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((document_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = auth.scope(&state.pool).documents();
    let (_, level) = load_requiring(&repo, &auth, document_id, PermissionLevel::Read).await?;

    let comment = repo
        .find_comment(document_id, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".into()))?;

    let is_author = comment.user_id == Some(auth.user_id);
    if !is_author && level < PermissionLevel::Approve {
        return Err(insufficient_access());
    }

    if !repo.delete_comment(document_id, comment_id).await? {
        return Err(ApiError::NotFound("Comment not found".into()));
    }

    Ok(Message::new("Comment deleted"))
}
