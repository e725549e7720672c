//! Key performance indicator domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Whether a KPI improves upwards or downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// How often a KPI is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// One recorded value of a KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub date: NaiveDate,
    pub value: f64,
}

/// KPI domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    pub direction: KpiDirection,
    pub frequency: KpiFrequency,
    pub measurements: Vec<Measurement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Kpi {
    /// Most recently appended measurement value.
    pub fn latest_value(&self) -> Option<f64> {
        self.measurements.last().map(|m| m.value)
    }

    /// Whether the latest value meets the target, given the direction.
    pub fn on_target(&self) -> Option<bool> {
        let latest = self.latest_value()?;
        let target = self.target_value?;
        Some(match self.direction {
            KpiDirection::HigherIsBetter => latest >= target,
            KpiDirection::LowerIsBetter => latest <= target,
        })
    }
}

/// KPI as returned by the API, with derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResponse {
    #[serde(flatten)]
    pub kpi: Kpi,
    pub latest_value: Option<f64>,
    pub on_target: Option<bool>,
}

impl From<Kpi> for KpiResponse {
    fn from(kpi: Kpi) -> Self {
        let latest_value = kpi.latest_value();
        let on_target = kpi.on_target();
        Self {
            kpi,
            latest_value,
            on_target,
        }
    }
}

/// Request payload for creating a KPI.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateKpiRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    #[validate(length(max = 50, message = "Unit must be at most 50 characters"))]
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    #[serde(default = "default_direction")]
    pub direction: KpiDirection,
    #[serde(default = "default_frequency")]
    pub frequency: KpiFrequency,
}

/// Request payload for updating a KPI.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKpiRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
    #[validate(length(max = 50, message = "Unit must be at most 50 characters"))]
    pub unit: Option<String>,
    pub target_value: Option<f64>,
    pub direction: Option<KpiDirection>,
    pub frequency: Option<KpiFrequency>,
}

/// Query parameters for listing KPIs.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListKpisQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

fn default_direction() -> KpiDirection {
    KpiDirection::HigherIsBetter
}

fn default_frequency() -> KpiFrequency {
    KpiFrequency::Monthly
}
