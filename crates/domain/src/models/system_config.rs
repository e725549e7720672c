//! Global system configuration entries managed by platform admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Placeholder returned instead of a secret value.
pub const SECRET_MASK: &str = "********";

/// A configuration key/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_secret: bool,
    pub updated_at: DateTime<Utc>,
}

impl SystemConfigEntry {
    /// The entry as it may be shown to clients.
    pub fn masked(mut self) -> Self {
        if self.is_secret {
            self.value = SECRET_MASK.to_string();
        }
        self
    }
}

/// Request payload for setting a configuration entry.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSystemConfigRequest {
    #[validate(length(max = 10000, message = "Value must be at most 10000 characters"))]
    pub value: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_secret: bool,
}

/// Validates a configuration key: 1-100 characters of `[A-Za-z0-9._-]`.
pub fn is_valid_config_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 100
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
