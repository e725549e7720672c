//! Audit checklist entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ChecklistStatus, Evidence};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for checklist_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "checklist_status", rename_all = "snake_case")]
pub enum ChecklistStatusDb {
    Compliant,
    NonCompliant,
    Observation,
    ImprovementOpportunity,
}

impl From<ChecklistStatusDb> for ChecklistStatus {
    fn from(db: ChecklistStatusDb) -> Self {
        match db {
            ChecklistStatusDb::Compliant => Self::Compliant,
            ChecklistStatusDb::NonCompliant => Self::NonCompliant,
            ChecklistStatusDb::Observation => Self::Observation,
            ChecklistStatusDb::ImprovementOpportunity => Self::ImprovementOpportunity,
        }
    }
}

impl From<ChecklistStatus> for ChecklistStatusDb {
    fn from(status: ChecklistStatus) -> Self {
        match status {
            ChecklistStatus::Compliant => Self::Compliant,
            ChecklistStatus::NonCompliant => Self::NonCompliant,
            ChecklistStatus::Observation => Self::Observation,
            ChecklistStatus::ImprovementOpportunity => Self::ImprovementOpportunity,
        }
    }
}

/// Database row mapping for the audit_checklists table.
#[derive(Debug, Clone, FromRow)]
pub struct ChecklistEntity {
    pub id: Uuid,
    pub audit_id: Uuid,
    pub position: i32,
    pub section: String,
    pub question: String,
    pub status: Option<ChecklistStatusDb>,
    pub notes: Option<String>,
    pub evidence: Json<Vec<Evidence>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChecklistEntity> for domain::models::ChecklistItem {
    fn from(entity: ChecklistEntity) -> Self {
        Self {
            id: entity.id,
            audit_id: entity.audit_id,
            position: entity.position,
            section: entity.section,
            question: entity.question,
            status: entity.status.map(Into::into),
            notes: entity.notes,
            evidence: entity.evidence.0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
