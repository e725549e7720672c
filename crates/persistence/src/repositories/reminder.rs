//! Document review reminder ledger.

use chrono::NaiveDate;
use domain::services::{ReminderTask, ReviewCandidate};
use sqlx::PgPool;

use crate::entities::ReviewCandidateEntity;
use crate::metrics::QueryTimer;

/// Repository used by the reminder job across all tenants.
#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Non-obsolete documents whose review date is on or before `until`.
    pub async fn due_for_review(
        &self,
        until: NaiveDate,
    ) -> Result<Vec<ReviewCandidate>, sqlx::Error> {
        let timer = QueryTimer::new("documents_due_for_review");
        let entities = sqlx::query_as::<_, ReviewCandidateEntity>(
            r#"
            SELECT id, tenant_id, title, responsible_id, next_review_date
            FROM documents
            WHERE status <> 'obsolete'
              AND next_review_date IS NOT NULL
              AND next_review_date <= $1
            ORDER BY next_review_date ASC, id ASC
            "#,
        )
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Record a reminder. Returns `false` when its dedupe key was already
    /// recorded, in which case the reminder must not be sent again.
    pub async fn record(&self, task: &ReminderTask) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO document_review_reminders (document_id, reminder_window, dedupe_key)
            VALUES ($1, $2, $3)
            ON CONFLICT (dedupe_key) DO NOTHING
            "#,
        )
        .bind(task.document_id)
        .bind(task.window.as_str())
        .bind(task.dedupe_key())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
