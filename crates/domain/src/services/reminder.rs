//! Document review reminder planning.
//!
//! A reminder is identified by its dedupe key, so planning the same
//! documents twice on the same day yields the same keys and the ledger
//! records each reminder at most once.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Which reminder a document is due for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderWindow {
    /// Review date falls within the lookahead period.
    Upcoming,
    /// Review date has passed.
    Overdue,
}

impl ReminderWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderWindow::Upcoming => "upcoming",
            ReminderWindow::Overdue => "overdue",
        }
    }

    /// Window for a review date, or `None` when no reminder is due yet.
    pub fn classify(review_date: NaiveDate, today: NaiveDate, lookahead_days: u32) -> Option<Self> {
        if review_date < today {
            Some(ReminderWindow::Overdue)
        } else if review_date <= today + Duration::days(i64::from(lookahead_days)) {
            Some(ReminderWindow::Upcoming)
        } else {
            None
        }
    }
}

impl fmt::Display for ReminderWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document with a pending review, as read by the reminder job.
#[derive(Debug, Clone)]
pub struct ReviewCandidate {
    pub document_id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub responsible_id: Option<Uuid>,
    pub next_review_date: NaiveDate,
}

/// One reminder to record and announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTask {
    pub document_id: Uuid,
    pub tenant_id: Uuid,
    pub responsible_id: Option<Uuid>,
    pub window: ReminderWindow,
    pub review_date: NaiveDate,
}

impl ReminderTask {
    /// Key under which the reminder is recorded, `{document}:{window}:{date}`.
    pub fn dedupe_key(&self) -> String {
        format!("{}:{}:{}", self.document_id, self.window, self.review_date)
    }
}

/// Builds the reminder tasks for the given candidates.
pub fn plan_reminders(
    candidates: &[ReviewCandidate],
    today: NaiveDate,
    lookahead_days: u32,
) -> Vec<ReminderTask> {
    candidates
        .iter()
        .filter_map(|c| {
            let window = ReminderWindow::classify(c.next_review_date, today, lookahead_days)?;
            Some(ReminderTask {
                document_id: c.document_id,
                tenant_id: c.tenant_id,
                responsible_id: c.responsible_id,
                window,
                review_date: c.next_review_date,
            })
        })
        .collect()
}
