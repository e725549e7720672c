//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{bearer_token, AuthContext};
pub use json::{ApiJson, ApiQuery, ValidatedJson};
