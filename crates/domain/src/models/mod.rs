//! Domain models for the audit manager.

pub mod audit;
pub mod capability;
pub mod checklist;
pub mod dashboard;
pub mod document;
pub mod kpi;
pub mod non_conformity;
pub mod risk;
pub mod standard;
pub mod system_config;
pub mod tenant;
pub mod user;

pub use audit::{Audit, AuditStatus, AuditType};
pub use capability::{Capability, CapabilitySet};
pub use checklist::{ChecklistItem, ChecklistStatus, Evidence};
pub use document::{Document, DocumentStatus, PermissionLevel};
pub use kpi::Kpi;
pub use non_conformity::NonConformity;
pub use risk::Risk;
pub use tenant::Tenant;
pub use user::{Role, User};
