//! System configuration repository for database operations.

use domain::models::system_config::SystemConfigEntry;
use sqlx::PgPool;

use crate::entities::SystemConfigEntity;

/// Repository for global configuration entries.
#[derive(Clone)]
pub struct SystemConfigRepository {
    pool: PgPool,
}

impl SystemConfigRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All entries ordered by key. Values are returned unmasked.
    pub async fn list(&self) -> Result<Vec<SystemConfigEntry>, sqlx::Error> {
        let entities = sqlx::query_as::<_, SystemConfigEntity>(
            "SELECT key, value, description, is_secret, updated_at FROM system_config ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Insert or replace an entry.
    pub async fn upsert(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
        is_secret: bool,
    ) -> Result<SystemConfigEntry, sqlx::Error> {
        let entity = sqlx::query_as::<_, SystemConfigEntity>(
            r#"
            INSERT INTO system_config (key, value, description, is_secret)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, system_config.description),
                is_secret = EXCLUDED.is_secret,
                updated_at = NOW()
            RETURNING key, value, description, is_secret, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(is_secret)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Delete an entry.
    pub async fn delete(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM system_config WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
