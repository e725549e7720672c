//! Audit entity (database row mapping).

use chrono::{DateTime, NaiveDateTime, Utc};
use domain::models::{AuditStatus, AuditType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for audit_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "audit_type", rename_all = "lowercase")]
pub enum AuditTypeDb {
    Internal,
    External,
    Supplier,
}

impl From<AuditTypeDb> for AuditType {
    fn from(db: AuditTypeDb) -> Self {
        match db {
            AuditTypeDb::Internal => Self::Internal,
            AuditTypeDb::External => Self::External,
            AuditTypeDb::Supplier => Self::Supplier,
        }
    }
}

impl From<AuditType> for AuditTypeDb {
    fn from(kind: AuditType) -> Self {
        match kind {
            AuditType::Internal => Self::Internal,
            AuditType::External => Self::External,
            AuditType::Supplier => Self::Supplier,
        }
    }
}

/// Database enum for audit_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "audit_status", rename_all = "snake_case")]
pub enum AuditStatusDb {
    Scheduled,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl From<AuditStatusDb> for AuditStatus {
    fn from(db: AuditStatusDb) -> Self {
        match db {
            AuditStatusDb::Scheduled => Self::Scheduled,
            AuditStatusDb::InProgress => Self::InProgress,
            AuditStatusDb::Paused => Self::Paused,
            AuditStatusDb::Completed => Self::Completed,
            AuditStatusDb::Cancelled => Self::Cancelled,
        }
    }
}

impl From<AuditStatus> for AuditStatusDb {
    fn from(status: AuditStatus) -> Self {
        match status {
            AuditStatus::Scheduled => Self::Scheduled,
            AuditStatus::InProgress => Self::InProgress,
            AuditStatus::Paused => Self::Paused,
            AuditStatus::Completed => Self::Completed,
            AuditStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Database row mapping for the audits table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub audit_type: AuditTypeDb,
    pub status: AuditStatusDb,
    pub planned_date: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub actual_date: Option<NaiveDateTime>,
    pub scope: Option<String>,
    pub objectives: Option<String>,
    pub iso_standard: Option<String>,
    pub conclusions: Option<String>,
    pub lead_auditor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuditEntity> for domain::models::Audit {
    fn from(entity: AuditEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            title: entity.title,
            audit_type: entity.audit_type.into(),
            status: entity.status.into(),
            planned_date: entity.planned_date,
            start_date: entity.start_date,
            end_date: entity.end_date,
            actual_date: entity.actual_date,
            scope: entity.scope,
            objectives: entity.objectives,
            iso_standard: entity.iso_standard,
            conclusions: entity.conclusions,
            lead_auditor_id: entity.lead_auditor_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
