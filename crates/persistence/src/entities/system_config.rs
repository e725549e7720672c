//! System configuration entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the system_config table.
#[derive(Debug, Clone, FromRow)]
pub struct SystemConfigEntity {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_secret: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<SystemConfigEntity> for domain::models::system_config::SystemConfigEntry {
    fn from(entity: SystemConfigEntity) -> Self {
        Self {
            key: entity.key,
            value: entity.value,
            description: entity.description,
            is_secret: entity.is_secret,
            updated_at: entity.updated_at,
        }
    }
}
