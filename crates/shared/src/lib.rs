//! Shared utilities and common types for the ISO Audit Manager backend.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id
//! - JWT access/refresh tokens carrying tenant and role claims
//! - Page-based pagination helpers
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
