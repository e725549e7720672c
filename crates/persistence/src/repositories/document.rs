//! Document repository for database operations.
//!
//! Versions, permissions and comments are reached through their document,
//! so every statement joins or filters on the document's tenant.

use chrono::NaiveDate;
use domain::models::document::{
    CreateDocumentRequest, CreateVersionRequest, Document, DocumentComment, DocumentPermission,
    DocumentStatus, DocumentStatusChange, DocumentVersion, ListDocumentsQuery, PermissionLevel,
    UpdateDocumentRequest, INITIAL_VERSION,
};
use shared::pagination::PageRequest;
use uuid::Uuid;

use crate::entities::{
    ConfidentialityDb, DocumentCommentEntity, DocumentEntity, DocumentPermissionEntity,
    DocumentStatusDb, DocumentVersionEntity, PermissionLevelDb,
};
use crate::metrics::QueryTimer;
use crate::scope::TenantScope;

/// Repository for the tenant's documents.
#[derive(Clone)]
pub struct DocumentRepository {
    scope: TenantScope,
}

impl DocumentRepository {
    pub(crate) fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    /// List documents, most recently updated first.
    pub async fn list(
        &self,
        query: &ListDocumentsQuery,
        page: PageRequest,
    ) -> Result<(Vec<Document>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_documents");
        let status = query.status.map(DocumentStatusDb::from);
        let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE tenant_id = $1
              AND ($2::document_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text IS NULL OR area = $4)
              AND ($5::text IS NULL OR title ILIKE '%' || $5 || '%'
                   OR original_name ILIKE '%' || $5 || '%')
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(query.category.as_deref())
        .bind(query.area.as_deref())
        .bind(search)
        .fetch_one(self.scope.pool())
        .await?;

        let entities = sqlx::query_as::<_, DocumentEntity>(
            r#"
            SELECT id, tenant_id, title, description, filename, original_name, mime_type,
                   size_bytes, storage_key, status, category, area, confidentiality,
                   current_version, uploaded_by, responsible_id, review_cycle_months,
                   next_review_date, approved_by, approved_at, created_at, updated_at
            FROM documents
            WHERE tenant_id = $1
              AND ($2::document_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text IS NULL OR area = $4)
              AND ($5::text IS NULL OR title ILIKE '%' || $5 || '%'
                   OR original_name ILIKE '%' || $5 || '%')
            ORDER BY updated_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(status)
        .bind(query.category.as_deref())
        .bind(query.area.as_deref())
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(self.scope.pool())
        .await?;
        timer.record();

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Find a document by ID.
    pub async fn find(&self, id: Uuid) -> Result<Option<Document>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            SELECT id, tenant_id, title, description, filename, original_name, mime_type,
                   size_bytes, storage_key, status, category, area, confidentiality,
                   current_version, uploaded_by, responsible_id, review_cycle_months,
                   next_review_date, approved_by, approved_at, created_at, updated_at
            FROM documents
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Register a document in `draft` together with its first version row.
    pub async fn create(
        &self,
        request: &CreateDocumentRequest,
        uploaded_by: Uuid,
        next_review_date: Option<NaiveDate>,
    ) -> Result<Document, sqlx::Error> {
        let timer = QueryTimer::new("create_document");
        let version = request.current_version.as_deref().unwrap_or(INITIAL_VERSION);
        let mut tx = self.scope.pool().begin().await?;

        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            INSERT INTO documents (tenant_id, title, description, filename, original_name,
                                   mime_type, size_bytes, storage_key, status, category, area,
                                   confidentiality, current_version, uploaded_by,
                                   responsible_id, review_cycle_months, next_review_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft', $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id, tenant_id, title, description, filename, original_name, mime_type,
                      size_bytes, storage_key, status, category, area, confidentiality,
                      current_version, uploaded_by, responsible_id, review_cycle_months,
                      next_review_date, approved_by, approved_at, created_at, updated_at
            "#,
        )
        .bind(self.scope.tenant_id())
        .bind(request.title.trim())
        .bind(request.description.as_deref())
        .bind(&request.filename)
        .bind(&request.original_name)
        .bind(&request.mime_type)
        .bind(request.size_bytes)
        .bind(&request.storage_key)
        .bind(request.category.as_deref())
        .bind(request.area.as_deref())
        .bind(ConfidentialityDb::from(request.confidentiality))
        .bind(version)
        .bind(uploaded_by)
        .bind(request.responsible_id)
        .bind(request.review_cycle_months)
        .bind(next_review_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO document_versions (document_id, version, changes, storage_key, created_by)
            VALUES ($1, $2, 'Initial version', $3, $4)
            "#,
        )
        .bind(entity.id)
        .bind(version)
        .bind(&request.storage_key)
        .bind(uploaded_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(entity.into())
    }

    /// Update document metadata.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateDocumentRequest,
    ) -> Result<Option<Document>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            UPDATE documents
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                area = COALESCE($6, area),
                confidentiality = COALESCE($7, confidentiality),
                responsible_id = COALESCE($8, responsible_id),
                review_cycle_months = COALESCE($9, review_cycle_months),
                next_review_date = COALESCE($10, next_review_date),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, title, description, filename, original_name, mime_type,
                      size_bytes, storage_key, status, category, area, confidentiality,
                      current_version, uploaded_by, responsible_id, review_cycle_months,
                      next_review_date, approved_by, approved_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(request.title.as_deref().map(str::trim))
        .bind(request.description.as_deref())
        .bind(request.category.as_deref())
        .bind(request.area.as_deref())
        .bind(request.confidentiality.map(ConfidentialityDb::from))
        .bind(request.responsible_id)
        .bind(request.review_cycle_months)
        .bind(request.next_review_date)
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Apply a status change while the document still has status `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: DocumentStatus,
        change: &DocumentStatusChange,
    ) -> Result<Option<Document>, sqlx::Error> {
        let timer = QueryTimer::new("update_document_status");
        let entity = sqlx::query_as::<_, DocumentEntity>(
            r#"
            UPDATE documents
            SET status = $4, approved_by = $5, approved_at = $6, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND status = $3
            RETURNING id, tenant_id, title, description, filename, original_name, mime_type,
                      size_bytes, storage_key, status, category, area, confidentiality,
                      current_version, uploaded_by, responsible_id, review_cycle_months,
                      next_review_date, approved_by, approved_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.scope.tenant_id())
        .bind(DocumentStatusDb::from(from))
        .bind(DocumentStatusDb::from(change.status))
        .bind(change.approved_by)
        .bind(change.approved_at)
        .fetch_optional(self.scope.pool())
        .await?;
        timer.record();

        Ok(entity.map(Into::into))
    }

    /// Delete a document. Versions, permissions, comments and reminders cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(self.scope.tenant_id())
            .execute(self.scope.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Version history, oldest first.
    pub async fn versions(&self, document_id: Uuid) -> Result<Vec<DocumentVersion>, sqlx::Error> {
        let entities = sqlx::query_as::<_, DocumentVersionEntity>(
            r#"
            SELECT v.id, v.document_id, v.version, v.changes, v.storage_key, v.created_by,
                   v.created_at
            FROM document_versions v
            JOIN documents d ON d.id = v.document_id
            WHERE v.document_id = $1 AND d.tenant_id = $2
            ORDER BY v.created_at ASC, v.id ASC
            "#,
        )
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .fetch_all(self.scope.pool())
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Append a version and make it current.
    pub async fn add_version(
        &self,
        document_id: Uuid,
        request: &CreateVersionRequest,
        created_by: Uuid,
    ) -> Result<Option<DocumentVersion>, sqlx::Error> {
        let timer = QueryTimer::new("add_document_version");
        let mut tx = self.scope.pool().begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE documents
            SET current_version = $3,
                storage_key = COALESCE($4, storage_key),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .bind(&request.version)
        .bind(request.storage_key.as_deref())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let entity = sqlx::query_as::<_, DocumentVersionEntity>(
            r#"
            INSERT INTO document_versions (document_id, version, changes, storage_key, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, document_id, version, changes, storage_key, created_by, created_at
            "#,
        )
        .bind(document_id)
        .bind(&request.version)
        .bind(request.changes.as_deref())
        .bind(request.storage_key.as_deref())
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(entity.into()))
    }

    /// Explicit grants on a document.
    pub async fn permissions(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentPermission>, sqlx::Error> {
        let entities = sqlx::query_as::<_, DocumentPermissionEntity>(
            r#"
            SELECT p.id, p.document_id, p.user_id, p.permission, p.granted_by, p.created_at,
                   p.updated_at
            FROM document_permissions p
            JOIN documents d ON d.id = p.document_id
            WHERE p.document_id = $1 AND d.tenant_id = $2
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .fetch_all(self.scope.pool())
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// The explicit grant of one user on a document, if any.
    pub async fn permission_for(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PermissionLevel>, sqlx::Error> {
        let level = sqlx::query_scalar::<_, PermissionLevelDb>(
            r#"
            SELECT p.permission
            FROM document_permissions p
            JOIN documents d ON d.id = p.document_id
            WHERE p.document_id = $1 AND p.user_id = $2 AND d.tenant_id = $3
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(level.map(Into::into))
    }

    /// Grant or change a user's level on a document. At most one row exists
    /// per `(document, user)`.
    pub async fn upsert_permission(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        level: PermissionLevel,
        granted_by: Uuid,
    ) -> Result<Option<DocumentPermission>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DocumentPermissionEntity>(
            r#"
            INSERT INTO document_permissions (document_id, user_id, permission, granted_by)
            SELECT d.id, $2, $4, $5
            FROM documents d
            WHERE d.id = $1 AND d.tenant_id = $3
            ON CONFLICT (document_id, user_id)
            DO UPDATE SET permission = EXCLUDED.permission,
                          granted_by = EXCLUDED.granted_by,
                          updated_at = NOW()
            RETURNING id, document_id, user_id, permission, granted_by, created_at, updated_at
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(self.scope.tenant_id())
        .bind(PermissionLevelDb::from(level))
        .bind(granted_by)
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Remove a user's explicit grant.
    pub async fn delete_permission(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM document_permissions p
            USING documents d
            WHERE p.document_id = $1 AND p.user_id = $2
              AND d.id = p.document_id AND d.tenant_id = $3
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(self.scope.tenant_id())
        .execute(self.scope.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Comments on a document, oldest first.
    pub async fn comments(&self, document_id: Uuid) -> Result<Vec<DocumentComment>, sqlx::Error> {
        let entities = sqlx::query_as::<_, DocumentCommentEntity>(
            r#"
            SELECT c.id, c.document_id, c.user_id, c.parent_id, c.content, c.created_at,
                   c.updated_at
            FROM document_comments c
            JOIN documents d ON d.id = c.document_id
            WHERE c.document_id = $1 AND d.tenant_id = $2
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .fetch_all(self.scope.pool())
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Find one comment of a document.
    pub async fn find_comment(
        &self,
        document_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<DocumentComment>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DocumentCommentEntity>(
            r#"
            SELECT c.id, c.document_id, c.user_id, c.parent_id, c.content, c.created_at,
                   c.updated_at
            FROM document_comments c
            JOIN documents d ON d.id = c.document_id
            WHERE c.id = $1 AND c.document_id = $2 AND d.tenant_id = $3
            "#,
        )
        .bind(comment_id)
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Add a comment or a reply.
    pub async fn add_comment(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        content: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Option<DocumentComment>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DocumentCommentEntity>(
            r#"
            INSERT INTO document_comments (document_id, user_id, parent_id, content)
            SELECT d.id, $2, $4, $5
            FROM documents d
            WHERE d.id = $1 AND d.tenant_id = $3
            RETURNING id, document_id, user_id, parent_id, content, created_at, updated_at
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(self.scope.tenant_id())
        .bind(parent_id)
        .bind(content.trim())
        .fetch_optional(self.scope.pool())
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Delete a comment. Replies cascade.
    pub async fn delete_comment(
        &self,
        document_id: Uuid,
        comment_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM document_comments c
            USING documents d
            WHERE c.id = $1 AND c.document_id = $2
              AND d.id = c.document_id AND d.tenant_id = $3
            "#,
        )
        .bind(comment_id)
        .bind(document_id)
        .bind(self.scope.tenant_id())
        .execute(self.scope.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
