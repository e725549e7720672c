//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod audit;
pub mod checklist;
pub mod document;
pub mod kpi;
pub mod non_conformity;
pub mod risk;
pub mod system_config;
pub mod tenant;
pub mod user;

pub use audit::{AuditEntity, AuditStatusDb, AuditTypeDb};
pub use checklist::{ChecklistEntity, ChecklistStatusDb};
pub use document::{
    ConfidentialityDb, DocumentCommentEntity, DocumentEntity, DocumentPermissionEntity,
    DocumentStatusDb, DocumentVersionEntity, PermissionLevelDb, ReviewCandidateEntity,
};
pub use kpi::{KpiDirectionDb, KpiEntity, KpiFrequencyDb};
pub use non_conformity::{NcSourceDb, NcStatusDb, NonConformityEntity, SeverityDb};
pub use risk::{RiskEntity, RiskStatusDb};
pub use system_config::SystemConfigEntity;
pub use tenant::{TenantEntity, TenantPlanDb, TenantStatusDb};
pub use user::{UserEntity, UserRoleDb};
