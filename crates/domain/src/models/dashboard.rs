//! Tenant dashboard aggregates.

use serde::Serialize;

/// Audit counts by status.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetrics {
    pub total: i64,
    pub scheduled: i64,
    pub in_progress: i64,
    pub paused: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Non-conformity counts by severity.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBreakdown {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}

/// Non-conformity counters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConformityMetrics {
    pub total: i64,
    pub open: i64,
    pub by_severity: SeverityBreakdown,
}

/// Document counts by status plus overdue reviews.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetrics {
    pub total: i64,
    pub draft: i64,
    pub under_review: i64,
    pub approved: i64,
    pub obsolete: i64,
    pub overdue_reviews: i64,
}

/// Risk counters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub total: i64,
    pub high_or_critical: i64,
}

/// Complete dashboard payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub audits: AuditMetrics,
    pub non_conformities: NonConformityMetrics,
    pub documents: DocumentMetrics,
    pub risks: RiskMetrics,
    pub kpis: i64,
}
