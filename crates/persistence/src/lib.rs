//! Persistence layer for the audit manager backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//!
//! Tenant-owned data is only reachable through [`TenantScope`]: the scoped
//! repositories bind the scope's tenant into every statement and expose no
//! way to pass a different one.

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod scope;

pub use scope::TenantScope;
