//! Document entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::document::{
    Confidentiality, DocumentComment, DocumentPermission, DocumentStatus, DocumentVersion,
    PermissionLevel,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for document_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
pub enum DocumentStatusDb {
    Draft,
    UnderReview,
    Approved,
    Obsolete,
}

impl From<DocumentStatusDb> for DocumentStatus {
    fn from(db: DocumentStatusDb) -> Self {
        match db {
            DocumentStatusDb::Draft => Self::Draft,
            DocumentStatusDb::UnderReview => Self::UnderReview,
            DocumentStatusDb::Approved => Self::Approved,
            DocumentStatusDb::Obsolete => Self::Obsolete,
        }
    }
}

impl From<DocumentStatus> for DocumentStatusDb {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::UnderReview => Self::UnderReview,
            DocumentStatus::Approved => Self::Approved,
            DocumentStatus::Obsolete => Self::Obsolete,
        }
    }
}

/// Database enum for document_confidentiality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "document_confidentiality", rename_all = "lowercase")]
pub enum ConfidentialityDb {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl From<ConfidentialityDb> for Confidentiality {
    fn from(db: ConfidentialityDb) -> Self {
        match db {
            ConfidentialityDb::Public => Self::Public,
            ConfidentialityDb::Internal => Self::Internal,
            ConfidentialityDb::Confidential => Self::Confidential,
            ConfidentialityDb::Restricted => Self::Restricted,
        }
    }
}

impl From<Confidentiality> for ConfidentialityDb {
    fn from(level: Confidentiality) -> Self {
        match level {
            Confidentiality::Public => Self::Public,
            Confidentiality::Internal => Self::Internal,
            Confidentiality::Confidential => Self::Confidential,
            Confidentiality::Restricted => Self::Restricted,
        }
    }
}

/// Database enum for permission_level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "permission_level", rename_all = "lowercase")]
pub enum PermissionLevelDb {
    Read,
    Write,
    Approve,
}

impl From<PermissionLevelDb> for PermissionLevel {
    fn from(db: PermissionLevelDb) -> Self {
        match db {
            PermissionLevelDb::Read => Self::Read,
            PermissionLevelDb::Write => Self::Write,
            PermissionLevelDb::Approve => Self::Approve,
        }
    }
}

impl From<PermissionLevel> for PermissionLevelDb {
    fn from(level: PermissionLevel) -> Self {
        match level {
            PermissionLevel::Read => Self::Read,
            PermissionLevel::Write => Self::Write,
            PermissionLevel::Approve => Self::Approve,
        }
    }
}

/// Database row mapping for the documents table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub status: DocumentStatusDb,
    pub category: Option<String>,
    pub area: Option<String>,
    pub confidentiality: ConfidentialityDb,
    pub current_version: String,
    pub uploaded_by: Option<Uuid>,
    pub responsible_id: Option<Uuid>,
    pub review_cycle_months: Option<i32>,
    pub next_review_date: Option<NaiveDate>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentEntity> for domain::models::Document {
    fn from(entity: DocumentEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            title: entity.title,
            description: entity.description,
            filename: entity.filename,
            original_name: entity.original_name,
            mime_type: entity.mime_type,
            size_bytes: entity.size_bytes,
            storage_key: entity.storage_key,
            status: entity.status.into(),
            category: entity.category,
            area: entity.area,
            confidentiality: entity.confidentiality.into(),
            current_version: entity.current_version,
            uploaded_by: entity.uploaded_by,
            responsible_id: entity.responsible_id,
            review_cycle_months: entity.review_cycle_months,
            next_review_date: entity.next_review_date,
            approved_by: entity.approved_by,
            approved_at: entity.approved_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the document_versions table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentVersionEntity {
    pub id: Uuid,
    pub document_id: Uuid,
    pub version: String,
    pub changes: Option<String>,
    pub storage_key: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentVersionEntity> for DocumentVersion {
    fn from(entity: DocumentVersionEntity) -> Self {
        Self {
            id: entity.id,
            document_id: entity.document_id,
            version: entity.version,
            changes: entity.changes,
            storage_key: entity.storage_key,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the document_permissions table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentPermissionEntity {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub permission: PermissionLevelDb,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentPermissionEntity> for DocumentPermission {
    fn from(entity: DocumentPermissionEntity) -> Self {
        Self {
            id: entity.id,
            document_id: entity.document_id,
            user_id: entity.user_id,
            permission: entity.permission.into(),
            granted_by: entity.granted_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the document_comments table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentCommentEntity {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentCommentEntity> for DocumentComment {
    fn from(entity: DocumentCommentEntity) -> Self {
        Self {
            id: entity.id,
            document_id: entity.document_id,
            user_id: entity.user_id,
            parent_id: entity.parent_id,
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Document due for review, as selected by the reminder job.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewCandidateEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub responsible_id: Option<Uuid>,
    pub next_review_date: NaiveDate,
}

impl From<ReviewCandidateEntity> for domain::services::ReviewCandidate {
    fn from(entity: ReviewCandidateEntity) -> Self {
        Self {
            document_id: entity.id,
            tenant_id: entity.tenant_id,
            title: entity.title,
            responsible_id: entity.responsible_id,
            next_review_date: entity.next_review_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_round_trip() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::UnderReview,
            DocumentStatus::Approved,
            DocumentStatus::Obsolete,
        ] {
            assert_eq!(DocumentStatus::from(DocumentStatusDb::from(status)), status);
        }
    }

    #[test]
    fn test_permission_conversion_round_trip() {
        for level in [
            PermissionLevel::Read,
            PermissionLevel::Write,
            PermissionLevel::Approve,
        ] {
            assert_eq!(PermissionLevel::from(PermissionLevelDb::from(level)), level);
        }
    }
}
