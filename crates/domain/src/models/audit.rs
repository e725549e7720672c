//! Audit domain models and lifecycle rules.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::checklist::ChecklistItem;
use crate::error::DomainError;

/// Kind of audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    Internal,
    External,
    Supplier,
}

impl AuditType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditType::Internal => "internal",
            AuditType::External => "external",
            AuditType::Supplier => "supplier",
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Scheduled,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Scheduled => "scheduled",
            AuditStatus::InProgress => "in_progress",
            AuditStatus::Paused => "paused",
            AuditStatus::Completed => "completed",
            AuditStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses reachable from this one.
    pub fn allowed_transitions(&self) -> &'static [AuditStatus] {
        match self {
            AuditStatus::Scheduled => &[AuditStatus::InProgress],
            AuditStatus::InProgress => &[
                AuditStatus::Paused,
                AuditStatus::Completed,
                AuditStatus::Cancelled,
            ],
            AuditStatus::Paused => &[AuditStatus::InProgress],
            AuditStatus::Completed | AuditStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AuditStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AuditStatus::Scheduled),
            "in_progress" => Ok(AuditStatus::InProgress),
            "paused" => Ok(AuditStatus::Paused),
            "completed" => Ok(AuditStatus::Completed),
            "cancelled" => Ok(AuditStatus::Cancelled),
            _ => Err(format!("Invalid audit status: {}", s)),
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub audit_type: AuditType,
    pub status: AuditStatus,
    pub planned_date: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub actual_date: Option<NaiveDateTime>,
    pub scope: Option<String>,
    pub objectives: Option<String>,
    pub iso_standard: Option<String>,
    pub conclusions: Option<String>,
    pub lead_auditor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit with its checklist and responsible users.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetail {
    #[serde(flatten)]
    pub audit: Audit,
    pub responsible_user_ids: Vec<Uuid>,
    pub checklists: Vec<ChecklistItem>,
}

/// Date columns written by a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: AuditStatus,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub actual_date: Option<NaiveDateTime>,
}

impl Audit {
    /// Applies the transition table to a requested status change.
    ///
    /// Entering `in_progress` stamps `start_date` when unset; entering
    /// `completed` stamps `end_date` and `actual_date`.
    pub fn transition(
        &self,
        next: AuditStatus,
        now: NaiveDateTime,
    ) -> Result<StatusChange, DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition("audit", self.status, next));
        }

        let mut change = StatusChange {
            status: next,
            start_date: self.start_date,
            end_date: self.end_date,
            actual_date: self.actual_date,
        };
        match next {
            AuditStatus::InProgress if change.start_date.is_none() => {
                change.start_date = Some(now);
            }
            AuditStatus::Completed => {
                change.end_date = Some(now);
                change.actual_date = Some(now);
            }
            _ => {}
        }
        Ok(change)
    }
}

/// Request payload for creating an audit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[serde(default = "default_audit_type")]
    pub audit_type: AuditType,

    #[validate(custom(function = "shared::validation::validate_microsecond_precision"))]
    pub planned_date: Option<NaiveDateTime>,

    #[validate(length(max = 5000, message = "Scope must be at most 5000 characters"))]
    pub scope: Option<String>,

    #[validate(length(max = 5000, message = "Objectives must be at most 5000 characters"))]
    pub objectives: Option<String>,

    #[validate(length(max = 50, message = "ISO standard must be at most 50 characters"))]
    pub iso_standard: Option<String>,

    pub lead_auditor_id: Option<Uuid>,

    #[serde(default)]
    pub responsible_user_ids: Vec<Uuid>,

    #[serde(default)]
    pub populate_from_standard: bool,
}

/// Request payload for updating an audit's descriptive fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuditRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: Option<String>,
    pub audit_type: Option<AuditType>,
    #[validate(custom(function = "shared::validation::validate_microsecond_precision"))]
    pub planned_date: Option<NaiveDateTime>,
    #[validate(length(max = 5000, message = "Scope must be at most 5000 characters"))]
    pub scope: Option<String>,
    #[validate(length(max = 5000, message = "Objectives must be at most 5000 characters"))]
    pub objectives: Option<String>,
    #[validate(length(max = 50, message = "ISO standard must be at most 50 characters"))]
    pub iso_standard: Option<String>,
    #[validate(length(max = 10000, message = "Conclusions must be at most 10000 characters"))]
    pub conclusions: Option<String>,
    /// `null` clears the lead auditor, an absent field keeps it.
    #[serde(default, deserialize_with = "super::checklist::double_option")]
    pub lead_auditor_id: Option<Option<Uuid>>,
    pub responsible_user_ids: Option<Vec<Uuid>>,
}

/// Request payload for changing an audit's status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuditStatusRequest {
    pub status: AuditStatus,
}

/// Query parameters for listing audits.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<AuditStatus>,
    pub audit_type: Option<AuditType>,
    pub search: Option<String>,
}

fn default_audit_type() -> AuditType {
    AuditType::Internal
}
