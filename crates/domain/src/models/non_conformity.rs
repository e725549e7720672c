//! Non-conformity domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Where a non-conformity was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NcSource {
    Audit,
    Process,
    Customer,
    Other,
}

/// Handling status of a non-conformity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NcStatus {
    Open,
    Analysis,
    ActionPlan,
    Verification,
    Closed,
}

impl NcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NcStatus::Open => "open",
            NcStatus::Analysis => "analysis",
            NcStatus::ActionPlan => "action_plan",
            NcStatus::Verification => "verification",
            NcStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for NcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a non-conformity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A corrective action planned for a non-conformity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveAction {
    pub id: Uuid,
    pub description: String,
    pub responsible_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Non-conformity domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConformity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub audit_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub source: NcSource,
    pub status: NcStatus,
    pub severity: Severity,
    pub root_cause_analysis: Option<serde_json::Value>,
    pub corrective_actions: Vec<CorrectiveAction>,
    pub due_date: Option<NaiveDate>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `closed_at` value after moving from `current` to `next`.
///
/// Entering `closed` stamps the time, staying closed keeps the original
/// stamp and leaving `closed` clears it.
pub fn closed_at_for(
    current: NcStatus,
    current_closed_at: Option<DateTime<Utc>>,
    next: NcStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (current, next) {
        (NcStatus::Closed, NcStatus::Closed) => current_closed_at.or(Some(now)),
        (_, NcStatus::Closed) => Some(now),
        _ => None,
    }
}

/// Request payload for creating a non-conformity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonConformityRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[serde(default = "default_source")]
    pub source: NcSource,

    #[serde(default = "default_severity")]
    pub severity: Severity,

    pub audit_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub root_cause_analysis: Option<serde_json::Value>,
}

/// Request payload for updating a non-conformity.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNonConformityRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,
    pub source: Option<NcSource>,
    pub status: Option<NcStatus>,
    pub severity: Option<Severity>,
    pub due_date: Option<NaiveDate>,
    pub root_cause_analysis: Option<serde_json::Value>,
}

/// Request payload for appending a corrective action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCorrectiveActionRequest {
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: String,
    pub responsible_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

impl AddCorrectiveActionRequest {
    pub fn into_action(self, now: DateTime<Utc>) -> CorrectiveAction {
        CorrectiveAction {
            id: Uuid::new_v4(),
            description: self.description,
            responsible_id: self.responsible_id,
            due_date: self.due_date,
            completed: false,
            created_at: now,
        }
    }
}

/// Query parameters for listing non-conformities.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListNonConformitiesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<NcStatus>,
    pub severity: Option<Severity>,
    pub source: Option<NcSource>,
    pub audit_id: Option<Uuid>,
    pub search: Option<String>,
}

fn default_source() -> NcSource {
    NcSource::Other
}

fn default_severity() -> Severity {
    Severity::Medium
}
