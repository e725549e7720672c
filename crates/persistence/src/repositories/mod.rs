//! Repository implementations for database operations.
//!
//! Tenant-owned repositories are obtained from a [`crate::TenantScope`];
//! the rest operate across tenants.

pub mod account;
pub mod audit;
pub mod checklist;
pub mod dashboard;
pub mod document;
pub mod kpi;
pub mod non_conformity;
pub mod reminder;
pub mod risk;
pub mod system_config;
pub mod tenant;
pub mod user;

pub use account::AccountRepository;
pub use audit::AuditRepository;
pub use checklist::ChecklistRepository;
pub use dashboard::DashboardRepository;
pub use document::DocumentRepository;
pub use kpi::KpiRepository;
pub use non_conformity::NonConformityRepository;
pub use reminder::ReminderRepository;
pub use risk::RiskRepository;
pub use system_config::SystemConfigRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
