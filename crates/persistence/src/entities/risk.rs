//! Risk entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::risk::RiskStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for risk_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "risk_status", rename_all = "lowercase")]
pub enum RiskStatusDb {
    Identified,
    Assessed,
    Mitigating,
    Accepted,
    Closed,
}

impl From<RiskStatusDb> for RiskStatus {
    fn from(db: RiskStatusDb) -> Self {
        match db {
            RiskStatusDb::Identified => Self::Identified,
            RiskStatusDb::Assessed => Self::Assessed,
            RiskStatusDb::Mitigating => Self::Mitigating,
            RiskStatusDb::Accepted => Self::Accepted,
            RiskStatusDb::Closed => Self::Closed,
        }
    }
}

impl From<RiskStatus> for RiskStatusDb {
    fn from(status: RiskStatus) -> Self {
        match status {
            RiskStatus::Identified => Self::Identified,
            RiskStatus::Assessed => Self::Assessed,
            RiskStatus::Mitigating => Self::Mitigating,
            RiskStatus::Accepted => Self::Accepted,
            RiskStatus::Closed => Self::Closed,
        }
    }
}

/// Database row mapping for the risks table.
#[derive(Debug, Clone, FromRow)]
pub struct RiskEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub description: String,
    pub category: Option<String>,
    pub probability: i32,
    pub impact: i32,
    pub mitigation_plan: Option<String>,
    pub status: RiskStatusDb,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RiskEntity> for domain::models::Risk {
    fn from(entity: RiskEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            description: entity.description,
            category: entity.category,
            probability: entity.probability,
            impact: entity.impact,
            mitigation_plan: entity.mitigation_plan,
            status: entity.status.into(),
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
