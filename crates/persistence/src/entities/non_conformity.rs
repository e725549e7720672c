//! Non-conformity entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::non_conformity::{CorrectiveAction, NcSource, NcStatus, Severity};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for nc_source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "nc_source", rename_all = "lowercase")]
pub enum NcSourceDb {
    Audit,
    Process,
    Customer,
    Other,
}

impl From<NcSourceDb> for NcSource {
    fn from(db: NcSourceDb) -> Self {
        match db {
            NcSourceDb::Audit => Self::Audit,
            NcSourceDb::Process => Self::Process,
            NcSourceDb::Customer => Self::Customer,
            NcSourceDb::Other => Self::Other,
        }
    }
}

impl From<NcSource> for NcSourceDb {
    fn from(source: NcSource) -> Self {
        match source {
            NcSource::Audit => Self::Audit,
            NcSource::Process => Self::Process,
            NcSource::Customer => Self::Customer,
            NcSource::Other => Self::Other,
        }
    }
}

/// Database enum for nc_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "nc_status", rename_all = "snake_case")]
pub enum NcStatusDb {
    Open,
    Analysis,
    ActionPlan,
    Verification,
    Closed,
}

impl From<NcStatusDb> for NcStatus {
    fn from(db: NcStatusDb) -> Self {
        match db {
            NcStatusDb::Open => Self::Open,
            NcStatusDb::Analysis => Self::Analysis,
            NcStatusDb::ActionPlan => Self::ActionPlan,
            NcStatusDb::Verification => Self::Verification,
            NcStatusDb::Closed => Self::Closed,
        }
    }
}

impl From<NcStatus> for NcStatusDb {
    fn from(status: NcStatus) -> Self {
        match status {
            NcStatus::Open => Self::Open,
            NcStatus::Analysis => Self::Analysis,
            NcStatus::ActionPlan => Self::ActionPlan,
            NcStatus::Verification => Self::Verification,
            NcStatus::Closed => Self::Closed,
        }
    }
}

/// Database enum for nc_severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "nc_severity", rename_all = "lowercase")]
pub enum SeverityDb {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityDb> for Severity {
    fn from(db: SeverityDb) -> Self {
        match db {
            SeverityDb::Low => Self::Low,
            SeverityDb::Medium => Self::Medium,
            SeverityDb::High => Self::High,
            SeverityDb::Critical => Self::Critical,
        }
    }
}

impl From<Severity> for SeverityDb {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::Low,
            Severity::Medium => Self::Medium,
            Severity::High => Self::High,
            Severity::Critical => Self::Critical,
        }
    }
}

/// Database row mapping for the non_conformities table.
#[derive(Debug, Clone, FromRow)]
pub struct NonConformityEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub audit_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub source: NcSourceDb,
    pub status: NcStatusDb,
    pub severity: SeverityDb,
    pub root_cause_analysis: Option<JsonValue>,
    pub corrective_actions: Json<Vec<CorrectiveAction>>,
    pub due_date: Option<NaiveDate>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NonConformityEntity> for domain::models::NonConformity {
    fn from(entity: NonConformityEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            audit_id: entity.audit_id,
            title: entity.title,
            description: entity.description,
            source: entity.source.into(),
            status: entity.status.into(),
            severity: entity.severity.into(),
            root_cause_analysis: entity.root_cause_analysis,
            corrective_actions: entity.corrective_actions.0,
            due_date: entity.due_date,
            closed_at: entity.closed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
