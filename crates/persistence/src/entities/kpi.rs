//! KPI entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::kpi::{KpiDirection, KpiFrequency, Measurement};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for kpi_direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "kpi_direction", rename_all = "snake_case")]
pub enum KpiDirectionDb {
    HigherIsBetter,
    LowerIsBetter,
}

impl From<KpiDirectionDb> for KpiDirection {
    fn from(db: KpiDirectionDb) -> Self {
        match db {
            KpiDirectionDb::HigherIsBetter => Self::HigherIsBetter,
            KpiDirectionDb::LowerIsBetter => Self::LowerIsBetter,
        }
    }
}

impl From<KpiDirection> for KpiDirectionDb {
    fn from(direction: KpiDirection) -> Self {
        match direction {
            KpiDirection::HigherIsBetter => Self::HigherIsBetter,
            KpiDirection::LowerIsBetter => Self::LowerIsBetter,
        }
    }
}

/// Database enum for kpi_frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "kpi_frequency", rename_all = "lowercase")]
pub enum KpiFrequencyDb {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<KpiFrequencyDb> for KpiFrequency {
    fn from(db: KpiFrequencyDb) -> Self {
        match db {
            KpiFrequencyDb::Daily => Self::Daily,
            KpiFrequencyDb::Weekly => Self::Weekly,
            KpiFrequencyDb::Monthly => Self::Monthly,
            KpiFrequencyDb::Quarterly => Self::Quarterly,
            KpiFrequencyDb::Yearly => Self::Yearly,
        }
    }
}

impl From<KpiFrequency> for KpiFrequencyDb {
    fn from(frequency: KpiFrequency) -> Self {
        match frequency {
            KpiFrequency::Daily => Self::Daily,
            KpiFrequency::Weekly => Self::Weekly,
            KpiFrequency::Monthly => Self::Monthly,
            KpiFrequency::Quarterly => Self::Quarterly,
            KpiFrequency::Yearly => Self::Yearly,
        }
    }
}

/// Database row mapping for the kpis table.
#[derive(Debug, Clone, FromRow)]
pub struct KpiEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    pub direction: KpiDirectionDb,
    pub frequency: KpiFrequencyDb,
    pub measurements: Json<Vec<Measurement>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<KpiEntity> for domain::models::Kpi {
    fn from(entity: KpiEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            name: entity.name,
            description: entity.description,
            category: entity.category,
            unit: entity.unit,
            target_value: entity.target_value,
            direction: entity.direction.into(),
            frequency: entity.frequency.into(),
            measurements: entity.measurements.0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
