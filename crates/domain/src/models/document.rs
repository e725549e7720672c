//! Controlled document domain models.
//!
//! A document moves through `draft -> under_review -> approved -> obsolete`
//! and owns append-only versions, per-user permission grants and a
//! one-level comment thread.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::capability::{Capability, CapabilitySet};
use crate::error::DomainError;

/// Version label given to a newly registered document.
pub const INITIAL_VERSION: &str = "1.0";

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    UnderReview,
    Approved,
    Obsolete,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::UnderReview => "under_review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Obsolete => "obsolete",
        }
    }

    pub fn allowed_transitions(&self) -> &'static [DocumentStatus] {
        match self {
            DocumentStatus::Draft => &[DocumentStatus::UnderReview],
            DocumentStatus::UnderReview => &[DocumentStatus::Approved, DocumentStatus::Draft],
            DocumentStatus::Approved => &[DocumentStatus::Obsolete, DocumentStatus::UnderReview],
            DocumentStatus::Obsolete => &[],
        }
    }

    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Access level needed to move a document into this status.
    pub fn required_level(&self) -> PermissionLevel {
        match self {
            DocumentStatus::Approved => PermissionLevel::Approve,
            _ => PermissionLevel::Write,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidentiality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidentiality {
    Public,
    Internal,
    Confidential,
    Restricted,
}

/// Access level on a document, ordered `read < write < approve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Read,
    Write,
    Approve,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Approve => "approve",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level a role grants on every document of the tenant.
pub fn role_default_level(capabilities: &CapabilitySet) -> Option<PermissionLevel> {
    if capabilities.contains(Capability::ApproveDocuments) {
        Some(PermissionLevel::Approve)
    } else if capabilities.contains(Capability::WriteDocuments) {
        Some(PermissionLevel::Write)
    } else if capabilities.contains(Capability::ReadDocuments) {
        Some(PermissionLevel::Read)
    } else {
        None
    }
}

/// Effective access of a user on a document. An explicit grant replaces the
/// role default, in both directions.
pub fn effective_level(
    explicit: Option<PermissionLevel>,
    capabilities: &CapabilitySet,
) -> Option<PermissionLevel> {
    explicit.or_else(|| role_default_level(capabilities))
}

/// Document domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub status: DocumentStatus,
    pub category: Option<String>,
    pub area: Option<String>,
    pub confidentiality: Confidentiality,
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

/// Columns written by a document status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStatusChange {
    pub status: DocumentStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Validates a status change for a caller holding `level` access.
    ///
    /// Returns `Ok(None)` when the caller's access is insufficient; the
    /// handler turns that into a 403.
    pub fn transition(
        &self,
        next: DocumentStatus,
        level: PermissionLevel,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<DocumentStatusChange>, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition("document", self.status, next));
        }
        if level < next.required_level() {
            return Ok(None);
        }

        let change = match next {
            DocumentStatus::Approved => DocumentStatusChange {
                status: next,
                approved_by: Some(actor),
                approved_at: Some(now),
            },
            _ => DocumentStatusChange {
                status: next,
                approved_by: self.approved_by,
                approved_at: self.approved_at,
            },
        };
        Ok(Some(change))
    }
}

/// First review date for a document with a review cycle.
pub fn next_review_from(today: NaiveDate, cycle_months: Option<i32>) -> Option<NaiveDate> {
    let months = u32::try_from(cycle_months?).ok().filter(|m| *m > 0)?;
    today.checked_add_months(Months::new(months))
}

/// An entry of a document's version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: Uuid,
    pub document_id: Uuid,
    pub version: String,
    pub changes: Option<String>,
    pub storage_key: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A per-user grant on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPermission {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub permission: PermissionLevel,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a document. Replies have a `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentComment {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentComment {
    /// Whether a new comment may reply to this one.
    pub fn accepts_replies(&self, document_id: Uuid) -> bool {
        self.document_id == document_id && self.parent_id.is_none()
    }
}

/// Request payload for registering a document.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Filename must be 1-255 characters"))]
    pub filename: String,

    #[validate(length(min = 1, max = 255, message = "Original name must be 1-255 characters"))]
    pub original_name: String,

    #[validate(length(min = 1, max = 127, message = "MIME type must be 1-127 characters"))]
    pub mime_type: String,

    #[validate(range(min = 0, message = "Size must not be negative"))]
    pub size_bytes: i64,

    #[validate(length(min = 1, max = 1024, message = "Storage key must be 1-1024 characters"))]
    pub storage_key: String,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 100, message = "Area must be at most 100 characters"))]
    pub area: Option<String>,

    #[serde(default = "default_confidentiality")]
    pub confidentiality: Confidentiality,

    #[validate(length(min = 1, max = 20, message = "Version must be 1-20 characters"))]
    pub current_version: Option<String>,

    pub responsible_id: Option<Uuid>,

    #[validate(range(min = 1, max = 120, message = "Review cycle must be 1-120 months"))]
    pub review_cycle_months: Option<i32>,

    pub next_review_date: Option<NaiveDate>,
}

/// Request payload for updating document metadata.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    #[validate(length(max = 100, message = "Area must be at most 100 characters"))]
    pub area: Option<String>,
    pub confidentiality: Option<Confidentiality>,
    pub responsible_id: Option<Uuid>,
    #[validate(range(min = 1, max = 120, message = "Review cycle must be 1-120 months"))]
    pub review_cycle_months: Option<i32>,
    pub next_review_date: Option<NaiveDate>,
}

/// Request payload for a document status change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentStatusRequest {
    pub status: DocumentStatus,
}

/// Request payload for appending a version.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    #[validate(length(min = 1, max = 20, message = "Version must be 1-20 characters"))]
    pub version: String,
    #[validate(length(max = 5000, message = "Changes must be at most 5000 characters"))]
    pub changes: Option<String>,
    #[validate(length(min = 1, max = 1024, message = "Storage key must be 1-1024 characters"))]
    pub storage_key: Option<String>,
}

/// Request payload for granting a permission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionRequest {
    pub user_id: Uuid,
    pub permission: PermissionLevel,
}

/// Request payload for adding a comment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
    pub parent_id: Option<Uuid>,
}

/// Query parameters for listing documents.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<DocumentStatus>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub search: Option<String>,
}

fn default_confidentiality() -> Confidentiality {
    Confidentiality::Internal
}
