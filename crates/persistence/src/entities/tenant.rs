//! Tenant entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::tenant::{TenantPlan, TenantStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for tenant_plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tenant_plan", rename_all = "lowercase")]
pub enum TenantPlanDb {
    Free,
    Basic,
    Professional,
    Enterprise,
}

impl From<TenantPlanDb> for TenantPlan {
    fn from(db: TenantPlanDb) -> Self {
        match db {
            TenantPlanDb::Free => Self::Free,
            TenantPlanDb::Basic => Self::Basic,
            TenantPlanDb::Professional => Self::Professional,
            TenantPlanDb::Enterprise => Self::Enterprise,
        }
    }
}

impl From<TenantPlan> for TenantPlanDb {
    fn from(plan: TenantPlan) -> Self {
        match plan {
            TenantPlan::Free => Self::Free,
            TenantPlan::Basic => Self::Basic,
            TenantPlan::Professional => Self::Professional,
            TenantPlan::Enterprise => Self::Enterprise,
        }
    }
}

/// Database enum for tenant_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "lowercase")]
pub enum TenantStatusDb {
    Trial,
    Active,
    Suspended,
    Cancelled,
}

impl From<TenantStatusDb> for TenantStatus {
    fn from(db: TenantStatusDb) -> Self {
        match db {
            TenantStatusDb::Trial => Self::Trial,
            TenantStatusDb::Active => Self::Active,
            TenantStatusDb::Suspended => Self::Suspended,
            TenantStatusDb::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TenantStatus> for TenantStatusDb {
    fn from(status: TenantStatus) -> Self {
        match status {
            TenantStatus::Trial => Self::Trial,
            TenantStatus::Active => Self::Active,
            TenantStatus::Suspended => Self::Suspended,
            TenantStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Database row mapping for the tenants table.
#[derive(Debug, Clone, FromRow)]
pub struct TenantEntity {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub plan: TenantPlanDb,
    pub status: TenantStatusDb,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantEntity> for domain::models::Tenant {
    fn from(entity: TenantEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            subdomain: entity.subdomain,
            plan: entity.plan.into(),
            status: entity.status.into(),
            trial_ends_at: entity.trial_ends_at,
            subscription_ends_at: entity.subscription_ends_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
