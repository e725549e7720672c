//! Tenant-scoped access to the database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::{
    AuditRepository, ChecklistRepository, DashboardRepository, DocumentRepository,
    KpiRepository, NonConformityRepository, RiskRepository, UserRepository,
};

/// The tenant a request acts for, together with the pool.
///
/// Built once per request from the verified access token. Every repository
/// obtained from a scope filters and stamps rows with this tenant.
#[derive(Clone)]
pub struct TenantScope {
    pool: PgPool,
    tenant_id: Uuid,
}

impl std::fmt::Debug for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantScope")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl TenantScope {
    pub fn new(pool: PgPool, tenant_id: Uuid) -> Self {
        Self { pool, tenant_id }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn audits(&self) -> AuditRepository {
        AuditRepository::new(self.clone())
    }

    pub fn checklists(&self) -> ChecklistRepository {
        ChecklistRepository::new(self.clone())
    }

    pub fn non_conformities(&self) -> NonConformityRepository {
        NonConformityRepository::new(self.clone())
    }

    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.clone())
    }

    pub fn kpis(&self) -> KpiRepository {
        KpiRepository::new(self.clone())
    }

    pub fn risks(&self) -> RiskRepository {
        RiskRepository::new(self.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.clone())
    }

    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.clone())
    }
}
