//! Domain layer for the ISO Audit Manager backend.
//!
//! This crate contains:
//! - Domain models and request/response DTOs
//! - Workflow rules (audit and document lifecycles, checklist templates)
//! - The role capability table
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
