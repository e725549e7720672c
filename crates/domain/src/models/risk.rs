//! Risk register domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Handling status of a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Identified,
    Assessed,
    Mitigating,
    Accepted,
    Closed,
}

/// Band a risk score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Level for a `probability * impact` score on the 1..=25 grid.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=4 => RiskLevel::Low,
            5..=9 => RiskLevel::Medium,
            10..=16 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

/// Lowest score classified as high.
pub const HIGH_RISK_SCORE: i32 = 10;

/// Risk domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub description: String,
    pub category: Option<String>,
    pub probability: i32,
    pub impact: i32,
    pub mitigation_plan: Option<String>,
    pub status: RiskStatus,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Risk {
    pub fn score(&self) -> i32 {
        self.probability * self.impact
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score())
    }
}

/// Risk as returned by the API, with derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    #[serde(flatten)]
    pub risk: Risk,
    pub score: i32,
    pub level: RiskLevel,
}

impl From<Risk> for RiskResponse {
    fn from(risk: Risk) -> Self {
        let score = risk.score();
        let level = risk.level();
        Self { risk, score, level }
    }
}

/// Request payload for creating a risk.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRiskRequest {
    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: String,

    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Probability must be between 1 and 5"))]
    pub probability: i32,

    #[validate(range(min = 1, max = 5, message = "Impact must be between 1 and 5"))]
    pub impact: i32,

    #[validate(length(max = 5000, message = "Mitigation plan must be at most 5000 characters"))]
    pub mitigation_plan: Option<String>,

    #[serde(default = "default_status")]
    pub status: RiskStatus,

    pub owner_id: Option<Uuid>,
}

/// Request payload for updating a risk.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRiskRequest {
    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Probability must be between 1 and 5"))]
    pub probability: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "Impact must be between 1 and 5"))]
    pub impact: Option<i32>,
    #[validate(length(max = 5000, message = "Mitigation plan must be at most 5000 characters"))]
    pub mitigation_plan: Option<String>,
    pub status: Option<RiskStatus>,
    pub owner_id: Option<Uuid>,
}

/// Query parameters for listing risks.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListRisksQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<RiskStatus>,
    pub category: Option<String>,
    pub min_score: Option<i32>,
}

fn default_status() -> RiskStatus {
    RiskStatus::Identified
}
