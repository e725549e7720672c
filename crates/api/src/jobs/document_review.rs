//! Document review reminder background job.
//!
//! Finds documents whose review is coming up or overdue and records one
//! reminder per document, window and review date. The ledger insert is the
//! dedupe point: only reminders recorded by this run are announced.

use chrono::{Duration, Utc};
use domain::services::{plan_reminders, ReminderTask};
use persistence::repositories::ReminderRepository;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::middleware::metrics::record_reminder_sent;

use super::scheduler::{Job, JobFrequency};

pub struct DocumentReviewReminderJob {
    pool: PgPool,
    lookahead_days: u32,
}

impl DocumentReviewReminderJob {
    pub fn new(pool: PgPool, lookahead_days: u32) -> Self {
        Self {
            pool,
            lookahead_days,
        }
    }
}

fn announce(task: &ReminderTask) {
    info!(
        tenant_id = %task.tenant_id,
        document_id = %task.document_id,
        responsible_id = ?task.responsible_id,
        window = %task.window,
        review_date = %task.review_date,
        "Document review reminder"
    );
    record_reminder_sent(task.window.as_str());
}

#[async_trait::async_trait]
impl Job for DocumentReviewReminderJob {
    fn name(&self) -> &'static str {
        "document_review_reminder"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let repo = ReminderRepository::new(self.pool.clone());
        let today = Utc::now().date_naive();
        let until = today + Duration::days(i64::from(self.lookahead_days));

        let candidates = repo
            .due_for_review(until)
            .await
            .map_err(|e| format!("Failed to load documents due for review: {}", e))?;
        let tasks = plan_reminders(&candidates, today, self.lookahead_days);

        let mut sent = 0usize;
        for task in &tasks {
            let recorded = repo
                .record(task)
                .await
                .map_err(|e| format!("Failed to record reminder {}: {}", task.dedupe_key(), e))?;
            if recorded {
                announce(task);
                sent += 1;
            } else {
                debug!(dedupe_key = %task.dedupe_key(), "Reminder already sent");
            }
        }

        info!(
            candidates = candidates.len(),
            planned = tasks.len(),
            sent = sent,
            "Document review reminders processed"
        );

        Ok(())
    }
}
