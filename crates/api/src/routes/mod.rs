//! HTTP route handlers.

pub mod admin;
pub mod audits;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod kpis;
pub mod non_conformities;
pub mod risks;
pub mod tenant;
pub mod users;
